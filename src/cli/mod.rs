//! # CLI Module
//!
//! Command implementations behind the `tunefind-playlist` binary. Each
//! command opens the cache, delegates to [`crate::api`] and reports the
//! outcome. Failures are printed once with [`crate::error!`], which exits
//! with status 1.
//!
//! ## Commands
//!
//! - [`fetch`] - scrape a media from Tunefind into the cache
//! - [`export`] - create or update the Spotify playlist of a cached media
//! - [`create_playlist`] - fetch followed by export
//! - [`list`] - show all cached media
//!
//! ## Usage
//!
//! ```bash
//! tunefind-playlist fetch "The Mocks"
//! tunefind-playlist export the-mocks --season 1
//! tunefind-playlist create-playlist some-movie --media-type movie
//! tunefind-playlist list
//! ```

mod create_playlist;
mod export;
mod fetch;
mod list;

use std::path::Path;

use crate::{
    credentials::{self, DEFAULT_DELIMITER},
    error,
    spotify::SpotifyClient,
    store::CacheStore,
};

pub use create_playlist::create_playlist;
pub use export::export;
pub use fetch::fetch;
pub use list::list;

async fn open_store(database: &Path) -> CacheStore {
    match CacheStore::open(database).await {
        Ok(store) => store,
        Err(e) => error!(
            "Cannot open cache database {}. Err: {}",
            database.display(),
            e
        ),
    }
}

fn spotify_client(credentials_arg: Option<&str>) -> SpotifyClient {
    let creds = match credentials::resolve(credentials_arg, DEFAULT_DELIMITER) {
        Ok(creds) => creds,
        Err(e) => error!("{}", e),
    };

    match SpotifyClient::new(creds) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client. Err: {}", e),
    }
}
