//! Typed failures for the token lifecycle, paginated reads, configuration and
//! the on-disk session.

use reqwest::StatusCode;
use thiserror::Error;

/// A grant or refresh exchange with the token endpoint failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
    #[error("no refresh token available, please log in again")]
    MissingRefreshToken,
    #[error("invalid basic authorization value: {0}")]
    InvalidBasicAuth(String),
    #[error("authorization denied: {0}")]
    Denied(String),
    #[error("cannot start login callback server: {0}")]
    CallbackServer(std::io::Error),
}

/// A paginated read failed. Never accompanied by a partial collection.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status { status: StatusCode, url: String },
    #[error("malformed page from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("not logged in, run spodump login")]
    NotLoggedIn,
}
