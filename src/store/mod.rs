//! Local SQLite cache of fetched media.
//!
//! The cache holds a small graph: every media owns either a flat list of
//! songs (movies, games) or a list of episodes which in turn link to songs
//! (shows). Songs are shared between media and episodes and keyed by their
//! catalog id, so fetching the same media twice never duplicates anything.
//!
//! # Example
//!
//! ```ignore
//! use tunefind_playlist::store::CacheStore;
//!
//! let store = CacheStore::open_url("sqlite::memory:").await?;
//! store.insert_data(&record).await?;
//! let uris = store.get_track_uris_for_show("the-mocks", Some(1)).await?;
//! ```

use std::{path::Path, str::FromStr};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{Res, debug};

mod insert;
mod query;

/// Handle to the cache database. Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct CacheStore {
    pool: SqlitePool,
}

impl CacheStore {
    /// Opens the cache file at `path`, creating it and its parent directory
    /// when missing, and applies pending migrations.
    pub async fn open(path: &Path) -> Res<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }
        Self::open_url(&format!("sqlite:{}", path.display())).await
    }

    /// Opens a database from a `sqlite:` URL, e.g. `sqlite::memory:`.
    pub async fn open_url(url: &str) -> Res<Self> {
        debug!("Opening cache database {}", url);
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Single connection: the tool runs one command at a time and an
        // in-memory database only lives as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Closes the underlying pool, waiting for the connection to be released.
    pub async fn close(self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
