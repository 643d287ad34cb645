use reqwest::{Client, StatusCode};

use crate::{
    config::Config,
    error::FetchError,
    spotify::auth::auth_header,
    types::{Artist, SearchArtistsResponse, TokenRecord},
};

/// Looks up the best match for `artist` via `GET /search`.
///
/// Works with an app-only token; returns `None` when nothing matched.
pub async fn search_artist(
    client: &Client,
    config: &Config,
    record: &TokenRecord,
    artist: &str,
) -> Result<Option<Artist>, FetchError> {
    let url = format!("{uri}/search", uri = config.api_url);
    let response = client
        .get(&url)
        .headers(auth_header(record))
        .query(&[("q", artist), ("type", "artist"), ("limit", "1")])
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status { status, url });
    }

    let body = response.text().await?;
    let result: SearchArtistsResponse =
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            url,
            reason: e.to_string(),
        })?;

    Ok(result.artists.items.into_iter().next())
}
