use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{
    Client, RequestBuilder, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::{AuthError, ConfigError},
    server::serve_api,
    types::{Credential, Grant, TokenRecord, TokenResponse},
    utils, warning,
};

/// How long the login flow waits for the provider to redirect back.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// What the callback server has seen so far for one login attempt.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// Random `state` value sent with the authorize request.
    pub expected_state: String,
    /// `Ok(code)` or `Err(error)` once the provider has redirected back.
    pub outcome: Option<Result<String, String>>,
}

impl LoginState {
    pub fn new(expected_state: String) -> Self {
        Self {
            expected_state,
            outcome: None,
        }
    }
}

pub type SharedLoginState = Arc<Mutex<Option<LoginState>>>;

/// Current wall-clock time in seconds since the epoch.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// `Basic base64(client_id ":" client_secret)`.
pub fn basic_auth_value(credential: &Credential) -> String {
    let raw = format!("{}:{}", credential.client_id, credential.client_secret);
    format!("Basic {}", STANDARD.encode(raw.as_bytes()))
}

/// Recovers the credential from a value produced by [`basic_auth_value`].
///
/// The `Basic ` prefix is optional. The split happens on the first `:`, so
/// secrets containing colons survive.
pub fn decode_basic_auth(value: &str) -> Result<Credential, AuthError> {
    let encoded = value.strip_prefix("Basic ").unwrap_or(value).trim();
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AuthError::InvalidBasicAuth(e.to_string()))?;
    let raw =
        String::from_utf8(bytes).map_err(|e| AuthError::InvalidBasicAuth(e.to_string()))?;

    match raw.split_once(':') {
        Some((client_id, client_secret)) => Ok(Credential::new(client_id, client_secret)),
        None => Err(AuthError::InvalidBasicAuth("missing ':' separator".to_string())),
    }
}

/// `Authorization: Bearer <access_token>`. Does not look at the expiry.
///
/// Records built by [`acquire`] and [`refresh`] always carry a token that is a
/// valid header value. For a hand-built record whose token contains control
/// characters the map comes back empty.
pub fn auth_header(record: &TokenRecord) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", record.access_token)) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// True iff `now > record.expires_at`. No leeway is applied.
pub fn is_expired(record: &TokenRecord, now: i64) -> bool {
    record.is_expired_at(now)
}

/// Exchanges a grant for a fresh [`TokenRecord`].
///
/// # Grants
///
/// - [`Grant::ClientCredentials`] sends `grant_type=client_credentials` with a
///   Basic authorization header. The record has no refresh token.
/// - [`Grant::AuthorizationCode`] sends the code, `redirect_uri` and the client
///   credential in the form body. The provider returns an access and a refresh
///   token.
///
/// # Errors
///
/// Any transport failure, non-2xx status or unparsable body is an [`AuthError`].
/// Nothing is retried.
pub async fn acquire(
    client: &Client,
    config: &Config,
    grant: &Grant,
) -> Result<TokenRecord, AuthError> {
    let credential = &config.credential;
    let request = match grant {
        Grant::ClientCredentials => client
            .post(&config.token_url)
            .header(AUTHORIZATION, basic_auth_value(credential))
            .form(&[("grant_type", "client_credentials")]),
        Grant::AuthorizationCode { code, redirect_uri } => {
            client.post(&config.token_url).form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
            ])
        }
    };

    let response = exchange(request).await?;
    if matches!(grant, Grant::AuthorizationCode { .. }) && response.refresh_token.is_none() {
        return Err(AuthError::InvalidResponse(
            "authorization code grant returned no refresh_token".to_string(),
        ));
    }

    TokenRecord::from_response(response, now(), None)
}

/// Trades the refresh token of `record` for a new record.
///
/// The new access token and expiry replace the old ones. When the provider
/// does not rotate the refresh token, the old one is carried over.
///
/// # Errors
///
/// [`AuthError::MissingRefreshToken`] without touching the network when the
/// record has no refresh token; otherwise the same failures as [`acquire`].
pub async fn refresh(
    client: &Client,
    config: &Config,
    record: &TokenRecord,
) -> Result<TokenRecord, AuthError> {
    let Some(refresh_token) = record.refresh_token.as_deref() else {
        return Err(AuthError::MissingRefreshToken);
    };

    let credential = &config.credential;
    let request = client.post(&config.token_url).form(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", credential.client_id.as_str()),
        ("client_secret", credential.client_secret.as_str()),
    ]);

    let response = exchange(request).await?;
    TokenRecord::from_response(response, now(), record.refresh_token.clone())
}

async fn exchange(request: RequestBuilder) -> Result<TokenResponse, AuthError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(AuthError::Status { status, body });
    }

    serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))
}

/// Provider login page for the authorization-code grant.
pub fn authorize_url(config: &Config, state: &str) -> Result<Url, ConfigError> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.credential.client_id.as_str()),
            ("response_type", "code"),
            ("scope", config.scope.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("state", state),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| ConfigError::Invalid {
        var: "SPOTIFY_AUTH_URL",
        reason: e.to_string(),
    })
}

/// Runs the complete authorization-code login.
///
/// 1. Binds the local callback server on `config.server_addr`
/// 2. Opens the provider login page in the browser
/// 3. Waits up to [`LOGIN_TIMEOUT`] for the redirect
/// 4. Exchanges the received code for a token record
///
/// # Errors
///
/// [`AuthError::CallbackServer`] right away if `config.server_addr` cannot be
/// bound; the browser is not opened then. [`AuthError::Denied`] if the
/// provider redirected with an `error` or the wait timed out, or any failure
/// of [`acquire`].
pub async fn login(client: &Client, config: &Config) -> Result<TokenRecord, AuthError> {
    let state = utils::generate_state();
    let auth_url =
        authorize_url(config, &state).map_err(|e| AuthError::Denied(e.to_string()))?;

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .map_err(AuthError::CallbackServer)?;

    let shared_state: SharedLoginState = Arc::new(Mutex::new(Some(LoginState::new(state))));

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = serve_api(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = wait_for_outcome(&shared_state, LOGIN_TIMEOUT).await;
    server.abort();

    match outcome {
        Some(Ok(code)) => {
            let grant = Grant::AuthorizationCode {
                code,
                redirect_uri: config.redirect_uri.clone(),
            };
            acquire(client, config, &grant).await
        }
        Some(Err(error)) => Err(AuthError::Denied(error)),
        None => Err(AuthError::Denied(
            "timed out waiting for the login redirect".to_string(),
        )),
    }
}

/// Polls the shared state every 250ms until the callback has recorded an
/// outcome or `max_wait` has passed.
pub async fn wait_for_outcome(
    shared_state: &SharedLoginState,
    max_wait: Duration,
) -> Option<Result<String, String>> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(outcome) = lock.as_ref().and_then(|s| s.outcome.clone()) {
            return Some(outcome);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    None
}
