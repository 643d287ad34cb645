use crate::{
    config::Config, error, info, management::SessionStore, spotify, success, utils, warning,
};

pub async fn login(config: &Config) {
    let client = super::http_client(config);

    info!(
        "Waiting for the Spotify login redirect on {}",
        config.redirect_uri
    );
    let record = match spotify::auth::login(&client, config).await {
        Ok(record) => record,
        Err(e) => error!("Login failed: {}", e),
    };

    let store = SessionStore::new();
    if let Err(e) = store.persist(&record).await {
        error!("Failed to save session: {}", e);
    }

    success!(
        "Login successful! Access token valid until {}",
        utils::format_timestamp(record.expires_at)
    );
}

pub async fn logout() {
    let store = SessionStore::new();
    match store.clear().await {
        Ok(()) => success!("Session removed"),
        Err(e) => warning!("Failed to remove session {}: {}", store.path().display(), e),
    }
}
