use tabled::Table;

use crate::{
    config::Config,
    error, info, spotify, success,
    types::{ArtistTableRow, Grant},
};

pub async fn search(config: &Config, artist: &str) {
    let client = super::http_client(config);
    let record = match spotify::auth::acquire(&client, config, &Grant::ClientCredentials).await {
        Ok(record) => record,
        Err(e) => error!("Client credentials grant failed: {}", e),
    };

    match spotify::artists::search_artist(&client, config, &record, artist).await {
        Ok(Some(found)) => {
            success!("Best match for \"{}\"", artist);
            println!("{}", Table::new(vec![ArtistTableRow::from(&found)]));
        }
        Ok(None) => info!("No artist found for \"{}\"", artist),
        Err(e) => error!("Search failed: {}", e),
    }
}
