use std::path::Path;

use crate::{api, error, tunefind::TunefindClient, types::MediaType};

pub async fn create_playlist(
    database: &Path,
    name: &str,
    credentials: Option<&str>,
    media_type: Option<MediaType>,
    season: Option<u32>,
) {
    let store = super::open_store(database).await;
    // Credentials are checked before scraping so a missing file fails fast.
    let client = super::spotify_client(credentials);
    let catalog = match TunefindClient::new() {
        Ok(c) => c,
        Err(e) => error!("Cannot create Tunefind client. Err: {}", e),
    };

    let result =
        api::create_playlist(&store, &catalog, &client, name, media_type, season).await;
    store.close().await;

    if let Err(e) = result {
        error!("Failed to create playlist for '{}'. Err: {}", name, e);
    }
}
