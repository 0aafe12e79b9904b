use std::path::Path;

use crate::{api, error, tunefind::TunefindClient, types::MediaType};

pub async fn fetch(database: &Path, name: &str, media_type: Option<MediaType>) {
    let store = super::open_store(database).await;

    let catalog = match TunefindClient::new() {
        Ok(c) => c,
        Err(e) => error!("Cannot create Tunefind client. Err: {}", e),
    };

    let result = api::fetch(&store, &catalog, name, media_type).await;
    store.close().await;

    if let Err(e) = result {
        error!("Failed to fetch '{}'. Err: {}", name, e);
    }
}
