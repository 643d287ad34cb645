use reqwest::Client;
use serde_json::Value;

use crate::{
    config::Config,
    error::FetchError,
    spotify::pagination::{AuthProvider, fetch_all},
    types::Page,
};

/// Page size requested from `/me/playlists`; the API maximum.
pub const PLAYLIST_PAGE_LIMIT: u32 = 50;

/// Retrieves every playlist of the current user.
///
/// Walks `GET /me/playlists` until the `next` cursor is exhausted. Playlist
/// objects are kept as raw JSON so the result can be dumped unmodified.
///
/// # Errors
///
/// Any [`FetchError`] from the walk; there is no partial result.
pub async fn get_user_playlists<A>(
    client: &Client,
    config: &Config,
    auth: &A,
) -> Result<Page<Value>, FetchError>
where
    A: AuthProvider,
{
    let start_url = format!(
        "{uri}/me/playlists?limit={limit}",
        uri = config.api_url,
        limit = PLAYLIST_PAGE_LIMIT
    );
    fetch_all(client, &start_url, auth).await
}
