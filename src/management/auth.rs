use std::sync::Arc;

use reqwest::{Client, header::HeaderMap};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::AuthError,
    spotify::{
        auth::{self, auth_header},
        pagination::AuthProvider,
    },
    types::TokenRecord,
};

/// Keeps one [`TokenRecord`] valid for every caller sharing it.
///
/// The record lives behind an async mutex that is held across the refresh
/// round trip, so at most one refresh is in flight and every waiter sees its
/// result.
#[derive(Clone)]
pub struct TokenManager {
    client: Client,
    config: Config,
    record: Arc<Mutex<TokenRecord>>,
}

impl TokenManager {
    pub fn new(client: Client, config: Config, record: TokenRecord) -> Self {
        TokenManager {
            client,
            config,
            record: Arc::new(Mutex::new(record)),
        }
    }

    /// Bearer header for the current record, refreshing first if it expired.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingRefreshToken`] when the record expired and cannot be
    /// refreshed (a new login is needed), or the failure of the refresh itself.
    pub async fn valid_header(&self) -> Result<HeaderMap, AuthError> {
        let mut record = self.record.lock().await;
        if auth::is_expired(&record, auth::now()) {
            *record = auth::refresh(&self.client, &self.config, &record).await?;
        }

        Ok(auth_header(&record))
    }

    /// Refreshes unconditionally, e.g. after the API rejected the token early.
    pub async fn force_refresh(&self) -> Result<(), AuthError> {
        let mut record = self.record.lock().await;
        *record = auth::refresh(&self.client, &self.config, &record).await?;
        Ok(())
    }

    /// Snapshot of the current record, for persisting it.
    pub async fn record(&self) -> TokenRecord {
        self.record.lock().await.clone()
    }
}

impl AuthProvider for TokenManager {
    async fn header(&self) -> Result<HeaderMap, AuthError> {
        self.valid_header().await
    }

    async fn on_unauthorized(&self, rejected: &HeaderMap) -> Result<(), AuthError> {
        let mut record = self.record.lock().await;
        // another caller already replaced the rejected token
        if auth_header(&record) != *rejected {
            return Ok(());
        }

        *record = auth::refresh(&self.client, &self.config, &record).await?;
        Ok(())
    }
}
