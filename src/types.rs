use std::fmt;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use crate::error::AuthError;

/// Application credential issued by the provider. Immutable for the process lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
}

impl Credential {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Grant used to obtain the first token of a session.
#[derive(Debug, Clone)]
pub enum Grant {
    /// App-only access; no refresh token is issued.
    ClientCredentials,
    /// One-time `code` from the login redirect. `redirect_uri` must match the
    /// one used to obtain the code.
    AuthorizationCode { code: String, redirect_uri: String },
}

/// Body returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// A bearer token together with its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Seconds since the epoch after which `access_token` is invalid.
    pub expires_at: i64,
}

impl TokenRecord {
    /// Builds a record from a token response received at `issued_at`.
    ///
    /// `expires_at` is exactly `issued_at + expires_in`. When the response
    /// carries no refresh token, `previous_refresh` is kept.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidResponse`] when `expires_in` is negative or pushes
    /// `expires_at` past `i64::MAX`, or when the access token cannot be sent
    /// in an `Authorization` header.
    pub fn from_response(
        response: TokenResponse,
        issued_at: i64,
        previous_refresh: Option<String>,
    ) -> Result<Self, AuthError> {
        if response.expires_in < 0 {
            return Err(AuthError::InvalidResponse(format!(
                "negative expires_in: {}",
                response.expires_in
            )));
        }

        let expires_at = issued_at.checked_add(response.expires_in).ok_or_else(|| {
            AuthError::InvalidResponse(format!("expires_in out of range: {}", response.expires_in))
        })?;

        if HeaderValue::from_str(&format!("Bearer {}", response.access_token)).is_err() {
            return Err(AuthError::InvalidResponse(
                "access_token is not a valid header value".to_string(),
            ));
        }

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at,
        })
    }

    /// True iff `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Envelope of one page of a cursor-paginated collection.
///
/// `items` and `next` must be present in every page (`next` may be `null`).
/// Every other field of the envelope is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub href: Option<String>,
    pub items: Vec<T>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> Page<T> {
    /// Appends a later page: items are concatenated, the cursor metadata is
    /// taken from `later`, and `extra` keeps the values of the first page.
    pub fn absorb(&mut self, later: Page<T>) {
        self.items.extend(later.items);
        self.previous = later.previous;
        self.href = later.href;
        self.next = later.next;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Page<Artist>,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub genres: String,
    pub popularity: String,
}

impl From<&Artist> for ArtistTableRow {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            genres: artist.genres.join(", "),
            popularity: artist
                .popularity
                .map(|p| p.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub owner: String,
    pub tracks: String,
    pub public: String,
}

impl From<&Value> for PlaylistTableRow {
    fn from(playlist: &Value) -> Self {
        let text = |v: &Value| v.as_str().unwrap_or_default().to_string();
        Self {
            name: text(&playlist["name"]),
            owner: text(&playlist["owner"]["display_name"]),
            tracks: playlist["tracks"]["total"]
                .as_u64()
                .map(|t| t.to_string())
                .unwrap_or_default(),
            public: playlist["public"]
                .as_bool()
                .map(|p| p.to_string())
                .unwrap_or_default(),
        }
    }
}
