use std::path::PathBuf;

use tabled::Table;

use crate::{
    config::Config,
    error,
    error::{FetchError, SessionError},
    info,
    management::{SessionStore, TokenManager, dump},
    spotify, success,
    types::PlaylistTableRow,
    warning,
};

pub async fn playlists(config: &Config, output: Option<PathBuf>, table: bool) {
    let store = SessionStore::new();
    let record = match store.load().await {
        Ok(record) => record,
        Err(SessionError::NotLoggedIn) => error!("Not logged in. Please run spodump login"),
        Err(e) => error!("Failed to load session: {}", e),
    };

    let client = super::http_client(config);
    let manager = TokenManager::new(client.clone(), config.clone(), record);

    let pb = super::spinner("Fetching playlists...");
    let result = spotify::playlists::get_user_playlists(&client, config, &manager).await;
    pb.finish_and_clear();

    // the record may have been refreshed during the walk
    if let Err(e) = store.persist(&manager.record().await).await {
        warning!("Failed to save refreshed session: {}", e);
    }

    let playlists = match result {
        Ok(playlists) => playlists,
        Err(FetchError::Auth(e)) => error!("{}. Please run spodump login", e),
        Err(e) => error!("Failed to fetch playlists: {}", e),
    };

    info!("{} playlists found!", playlists.items.len());

    if table {
        let rows: Vec<PlaylistTableRow> =
            playlists.items.iter().map(PlaylistTableRow::from).collect();
        println!("{}", Table::new(rows));
    }

    let path = output.unwrap_or_else(|| config.dump_path.clone());
    if let Err(e) = dump::write_json(&path, &playlists).await {
        error!("Failed to write {}: {}", path.display(), e);
    }

    success!("Playlists written to {}", path.display());
}
