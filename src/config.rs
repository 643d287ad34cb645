//! Configuration management for spodump.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (`<data_local_dir>/spodump/.env`)
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)
//!
//! Loading the environment never talks to the network. Building a [`Config`]
//! only reads variables; token acquisition is an explicit later step.

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use reqwest::Client;

use crate::{error::ConfigError, types::Credential};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:5000/callback";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DUMP_PATH: &str = "playground/my_playlists.json";

/// Loads environment variables from `.env` files.
///
/// Creates `<data_local_dir>/spodump/` if it doesn't exist, then loads the
/// `.env` found there and afterwards one from the working directory. Variables
/// that are already set are never overwritten, and absent files are skipped.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns the per-user data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spodump");
    path
}

/// Immutable snapshot of every setting a run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub credential: Credential,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: SocketAddr,
    pub http_timeout: Duration,
    pub dump_path: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when `CLIENT_ID` or `CLIENT_SECRET` is unset,
    /// [`ConfigError::Invalid`] when a numeric or address value can't be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = required("CLIENT_ID")?;
        let client_secret = required("CLIENT_SECRET")?;

        let server_addr = parse_var("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)?;
        let timeout_secs: u64 =
            parse_var("HTTP_TIMEOUT_SECS", &DEFAULT_HTTP_TIMEOUT_SECS.to_string())?;

        Ok(Self {
            credential: Credential::new(client_id, client_secret),
            redirect_uri: optional("REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: optional("SPOTIFY_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            server_addr,
            http_timeout: Duration::from_secs(timeout_secs),
            dump_path: PathBuf::from(optional("PLAYLIST_DUMP_PATH", DEFAULT_DUMP_PATH)),
        })
    }

    /// Configuration with the public Spotify endpoints and the given credential.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            dump_path: PathBuf::from(DEFAULT_DUMP_PATH),
        }
    }

    /// The HTTP client shared by every call of a run, bounded by the
    /// configured per-call timeout.
    pub fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.http_timeout).build()
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn optional(var: &'static str, default: &str) -> String {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(var, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
}
