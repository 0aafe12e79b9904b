use std::path::Path;

use crate::{api, error};

pub async fn export(database: &Path, name: &str, credentials: Option<&str>, season: Option<u32>) {
    let store = super::open_store(database).await;
    let client = super::spotify_client(credentials);

    let result = api::export(&store, &client, name, season).await;
    store.close().await;

    if let Err(e) = result {
        error!("Failed to export '{}'. Err: {}", name, e);
    }
}
