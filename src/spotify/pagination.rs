use std::{collections::HashSet, future::Future};

use reqwest::{Client, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;

use crate::{
    error::{AuthError, FetchError},
    spotify::auth::auth_header,
    types::{Page, TokenRecord},
};

/// Supplies the authorization headers for resource requests.
pub trait AuthProvider {
    /// Headers for the next request. Called before every page so a refreshed
    /// token is picked up mid-walk.
    fn header(&self) -> impl Future<Output = Result<HeaderMap, AuthError>> + Send;

    /// Called once when a request carrying `rejected` came back 401.
    fn on_unauthorized(
        &self,
        rejected: &HeaderMap,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// A fixed token that cannot be refreshed, e.g. from a client-credentials grant.
#[derive(Debug, Clone)]
pub struct StaticBearer {
    record: TokenRecord,
}

impl StaticBearer {
    pub fn new(record: TokenRecord) -> Self {
        Self { record }
    }
}

impl AuthProvider for StaticBearer {
    async fn header(&self) -> Result<HeaderMap, AuthError> {
        Ok(auth_header(&self.record))
    }

    async fn on_unauthorized(&self, _rejected: &HeaderMap) -> Result<(), AuthError> {
        Err(AuthError::MissingRefreshToken)
    }
}

/// Materializes a whole collection by following `next` links from `start_url`.
///
/// Pages are fetched one after another. Items are concatenated in fetch order,
/// `href`/`previous`/`next` reflect the last page and all other envelope
/// fields are those of the first page. An empty page with a `next` link does
/// not end the walk.
///
/// # Errors
///
/// Any failed page aborts the whole walk with a [`FetchError`]; no partial
/// collection is returned.
pub async fn fetch_all<T, A>(
    client: &Client,
    start_url: &str,
    auth: &A,
) -> Result<Page<T>, FetchError>
where
    T: DeserializeOwned,
    A: AuthProvider,
{
    let mut visited = HashSet::from([start_url.to_string()]);
    let mut collection: Page<T> = fetch_page(client, start_url, auth).await?;

    while let Some(next) = collection.next.clone() {
        if !visited.insert(next.clone()) {
            return Err(FetchError::Malformed {
                url: next,
                reason: "pagination cursor points back to an earlier page".to_string(),
            });
        }

        let page = fetch_page(client, &next, auth).await?;
        collection.absorb(page);
    }

    Ok(collection)
}

/// Fetches and parses a single page envelope.
///
/// A 401 makes `auth` refresh once and the request is repeated; a second 401
/// is returned as [`FetchError::Status`].
pub async fn fetch_page<T, A>(client: &Client, url: &str, auth: &A) -> Result<Page<T>, FetchError>
where
    T: DeserializeOwned,
    A: AuthProvider,
{
    let mut retried = false;

    loop {
        let headers = auth.header().await?;
        let response = client.get(url).headers(headers.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && !retried {
            auth.on_unauthorized(&headers).await?;
            retried = true;
            continue;
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        return serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        });
    }
}
