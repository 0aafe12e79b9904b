#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use tunefind_playlist::{
    Error, Res,
    playlist::PlaylistService,
    store::CacheStore,
    tunefind::CatalogClient,
    types::{
        Episode, MediaContent, MediaRecord, MediaType, PlaylistItem, PlaylistSummary, Season, Song,
    },
    utils,
};

pub const SHOW_NAME: &str = "the-mocks";
pub const MOVIE_NAME: &str = "mockies-adventures";
pub const GAME_NAME: &str = "mockricilious";

pub fn song(id: &str, name: &str, spotify: &str, artists: &str) -> Song {
    Song {
        id: id.to_string(),
        name: name.to_string(),
        spotify: spotify.to_string(),
        artists: artists.to_string(),
    }
}

/// Show with two seasons: two episodes with four resolved songs in season 1
/// and one episode whose only song is unresolved in season 2.
pub fn mock_show() -> MediaRecord {
    MediaRecord {
        media_name: SHOW_NAME.to_string(),
        media_type: MediaType::Show,
        readable_name: "The Mocks".to_string(),
        content: MediaContent::Show {
            seasons: vec![
                Season {
                    name: "Season 1".to_string(),
                    id: "season/1".to_string(),
                    episodes: vec![
                        Episode {
                            name: "Episode 1".to_string(),
                            id: "110".to_string(),
                            songs: vec![
                                song("111", "This is a test.", "spotify:track:DEADBEEF", "The author"),
                                song("112", "It's so fluffy!", "spotify:track:unicorn", "Agnes"),
                            ],
                        },
                        Episode {
                            name: "Episode 2".to_string(),
                            id: "120".to_string(),
                            songs: vec![
                                song("121", "This is another test.", "spotify:track:C0FEBABE", "The author"),
                                song("122", "It's so fluufffffy!!!", "spotify:track:UNICORN", "Agnes"),
                            ],
                        },
                    ],
                },
                Season {
                    name: "Season 2".to_string(),
                    id: "season/2".to_string(),
                    episodes: vec![Episode {
                        name: "Episode 1".to_string(),
                        id: "210".to_string(),
                        songs: vec![song("211", "No name.", "", "No one.")],
                    }],
                },
            ],
        },
    }
}

fn flat_songs(first_id: u32) -> Vec<Song> {
    let ids: Vec<String> = (first_id..first_id + 5).map(|i| i.to_string()).collect();
    vec![
        song(&ids[0], "This is a test.", "spotify:track:DEADBEEF", "The author"),
        song(&ids[1], "It's so fluffy!", "spotify:track:unicorn", "Agnes"),
        song(&ids[2], "This is another test.", "spotify:track:C0FEBABE", "The author"),
        song(&ids[3], "It's so fluufffffy!!!", "spotify:track:UNICORN", "Agnes"),
        song(&ids[4], "No name.", "", "No one."),
    ]
}

pub fn mock_movie() -> MediaRecord {
    MediaRecord {
        media_name: MOVIE_NAME.to_string(),
        media_type: MediaType::Movie,
        readable_name: "Mockies Adventures".to_string(),
        content: MediaContent::Songs {
            songs: flat_songs(5),
        },
    }
}

pub fn mock_game() -> MediaRecord {
    MediaRecord {
        media_name: GAME_NAME.to_string(),
        media_type: MediaType::Game,
        readable_name: "Mockricilious".to_string(),
        content: MediaContent::Songs {
            songs: flat_songs(1000),
        },
    }
}

pub fn uris(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("spotify:track:{}{:04}", prefix, i))
        .collect()
}

/// A cache database in a temporary directory. The directory lives as long as
/// the returned guard.
pub async fn temp_store() -> (TempDir, PathBuf, CacheStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cache.db");
    let store = CacheStore::open(&path).await.expect("open store");
    (dir, path, store)
}

/// Counts the rows of `table` through a separate connection.
pub async fn count_rows(path: &PathBuf, table: &str) -> i64 {
    let pool = SqlitePool::connect(&format!("sqlite:{}", path.display()))
        .await
        .expect("connect");
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&pool)
        .await
        .expect("count");
    pool.close().await;
    count
}

#[derive(Debug, Clone)]
pub struct FakePlaylist {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub description: String,
    pub items: Vec<Option<String>>,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub current_user: usize,
    pub list_playlists: usize,
    pub create: usize,
    pub update: usize,
    pub list_items: usize,
    pub add: usize,
    pub max_batch: usize,
}

/// In-memory playlist service.
#[derive(Default)]
pub struct FakePlaylistService {
    pub playlists: Mutex<Vec<FakePlaylist>>,
    pub calls: Mutex<Calls>,
    /// Pages never hold more than this many entries when set, regardless of
    /// the requested limit.
    pub page_cap: Option<usize>,
    pub fail_add: bool,
    next_id: AtomicUsize,
}

impl FakePlaylistService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_cap(page_cap: usize) -> Self {
        Self {
            page_cap: Some(page_cap),
            ..Self::default()
        }
    }

    pub fn failing_add() -> Self {
        Self {
            fail_add: true,
            ..Self::default()
        }
    }

    /// Adds a playlist owned by the user, returning its id.
    pub fn seed(&self, name: &str, items: Vec<String>) -> String {
        let id = format!("seed{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.playlists.lock().unwrap().push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            public: true,
            description: String::new(),
            items: items.into_iter().map(Some).collect(),
        });
        id
    }

    pub fn seed_local_item(&self, playlist_id: &str) {
        let mut playlists = self.playlists.lock().unwrap();
        if let Some(p) = playlists.iter_mut().find(|p| p.id == playlist_id) {
            p.items.push(None);
        }
    }

    pub fn playlist(&self, name: &str) -> Option<FakePlaylist> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    pub fn items(&self, name: &str) -> Vec<String> {
        self.playlist(name)
            .map(|p| p.items.into_iter().flatten().collect())
            .unwrap_or_default()
    }

    pub fn remote_calls(&self) -> usize {
        let c = self.calls.lock().unwrap();
        c.current_user + c.list_playlists + c.create + c.update + c.list_items + c.add
    }

    fn page<T: Clone>(&self, all: &[T], limit: u32, offset: u32) -> Vec<T> {
        let size = match self.page_cap {
            Some(cap) => cap.min(limit as usize),
            None => limit as usize,
        };
        all.iter()
            .skip(offset as usize)
            .take(size)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlaylistService for FakePlaylistService {
    async fn current_user_id(&self) -> Res<String> {
        self.calls.lock().unwrap().current_user += 1;
        Ok("mock-user".to_string())
    }

    async fn list_own_playlists(&self, limit: u32, offset: u32) -> Res<Vec<PlaylistSummary>> {
        self.calls.lock().unwrap().list_playlists += 1;
        let summaries: Vec<PlaylistSummary> = self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .map(|p| PlaylistSummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();
        Ok(self.page(&summaries, limit, offset))
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Res<PlaylistSummary> {
        assert_eq!(owner_id, "mock-user");
        self.calls.lock().unwrap().create += 1;
        let id = format!("created{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.playlists.lock().unwrap().push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            public,
            description: description.to_string(),
            items: Vec::new(),
        });
        Ok(PlaylistSummary {
            id,
            name: name.to_string(),
        })
    }

    async fn update_playlist_metadata(
        &self,
        playlist_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Res<()> {
        self.calls.lock().unwrap().update += 1;
        let mut playlists = self.playlists.lock().unwrap();
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| Error::RemoteService {
                status: 404,
                message: "Not found".to_string(),
            })?;
        playlist.name = name.to_string();
        playlist.public = public;
        playlist.description = description.to_string();
        Ok(())
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItem>> {
        self.calls.lock().unwrap().list_items += 1;
        let items: Vec<PlaylistItem> = self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| {
                p.items
                    .iter()
                    .map(|uri| PlaylistItem {
                        track_uri: uri.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(self.page(&items, limit, offset))
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.add += 1;
            calls.max_batch = calls.max_batch.max(uris.len());
        }
        if self.fail_add {
            return Err(Error::RemoteService {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        let mut playlists = self.playlists.lock().unwrap();
        if let Some(p) = playlists.iter_mut().find(|p| p.id == playlist_id) {
            p.items.extend(uris.iter().cloned().map(Some));
        }
        Ok(())
    }
}

/// Catalog serving fixed records.
#[derive(Default)]
pub struct FakeCatalog {
    records: HashMap<String, MediaRecord>,
    pub resolved: AtomicUsize,
}

impl FakeCatalog {
    pub fn with(records: Vec<MediaRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.media_name.clone(), r))
                .collect(),
            resolved: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn resolve(&self, name: &str, _media_type: Option<MediaType>) -> Res<MediaRecord> {
        self.resolved.fetch_add(1, Ordering::SeqCst);
        let name = utils::normalize_media_name(name);
        self.records
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::MediaNotFound(name.clone()))
    }
}
