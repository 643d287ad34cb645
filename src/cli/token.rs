use crate::{config::Config, error, spotify, success, types::Grant, utils};

/// Obtains an app-only token and reports its lifetime. The token itself is
/// never printed.
pub async fn token(config: &Config) {
    let client = super::http_client(config);
    let record = match spotify::auth::acquire(&client, config, &Grant::ClientCredentials).await {
        Ok(record) => record,
        Err(e) => error!("Client credentials grant failed: {}", e),
    };

    success!(
        "Token issued, valid until {} ({})",
        utils::format_timestamp(record.expires_at),
        utils::format_remaining(record.expires_at, spotify::auth::now())
    );
}
