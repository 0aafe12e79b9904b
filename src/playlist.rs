//! Playlist synchronization.
//!
//! [`synchronize`] makes a named playlist contain a desired set of tracks. It
//! only ever adds tracks: anything already in the playlist stays there.

use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res, debug, info,
    types::{PlaylistItem, PlaylistSummary},
    utils,
};

/// Page size for every paginated listing and the maximum number of tracks
/// added per request.
pub const PAGE_SIZE: u32 = 50;

/// Remote playlist operations the synchronizer relies on.
///
/// # Errors
///
/// Every method returns [`Error::RemoteService`](crate::Error::RemoteService)
/// when the service rejects the request. Calls are not retried.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Id of the user the service acts for. New playlists are owned by them.
    async fn current_user_id(&self) -> Res<String>;

    /// One page of the current user's playlists. An empty page marks the end.
    async fn list_own_playlists(&self, limit: u32, offset: u32) -> Res<Vec<PlaylistSummary>>;

    /// Creates a playlist for `owner_id` and returns it with its new id.
    /// Services may ignore `description` on creation, so it is set again with
    /// [`PlaylistService::update_playlist_metadata`].
    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Res<PlaylistSummary>;

    /// Replaces name, visibility and description of a playlist.
    async fn update_playlist_metadata(
        &self,
        playlist_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Res<()>;

    /// One page of a playlist's items. An empty page marks the end.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItem>>;

    /// Appends `uris` to the playlist. At most [`PAGE_SIZE`] per call.
    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()>;
}

/// Outcome of a [`synchronize`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub playlist_id: String,
    /// Whether the playlist did not exist before.
    pub created: bool,
    /// Number of tracks added to the playlist.
    pub added: usize,
    /// Number of repeated URIs dropped from the input.
    pub duplicates_removed: usize,
}

/// Creates or updates the playlist `name` so that it contains every URI in
/// `desired`.
///
/// A new playlist is created private, then its description is set with a
/// separate call and the tracks are added in batches. An existing playlist
/// gets its details refreshed and each desired track is added only if it is
/// not in the playlist yet.
///
/// # Errors
///
/// Any failing remote call aborts the synchronization and is returned as is.
pub async fn synchronize(
    service: &dyn PlaylistService,
    name: &str,
    desired: Vec<String>,
    description: &str,
) -> Res<SyncReport> {
    let (desired, duplicates_removed) = utils::dedup_preserving_order(desired);
    if duplicates_removed > 0 {
        info!("Removed {} duplicate tracks", duplicates_removed);
    }

    match find_playlist(service, name).await? {
        None => {
            let owner = service.current_user_id().await?;
            let playlist = service.create_playlist(&owner, name, false, "").await?;
            // Descriptions passed on creation are not reliably stored.
            service
                .update_playlist_metadata(&playlist.id, name, false, description)
                .await?;
            debug!("Created playlist '{}' with id {}", name, playlist.id);

            let pb = progress_bar(desired.len() as u64, "Adding tracks");
            for chunk in desired.chunks(PAGE_SIZE as usize) {
                service.add_items(&playlist.id, chunk).await?;
                pb.inc(chunk.len() as u64);
            }
            pb.finish_and_clear();

            Ok(SyncReport {
                playlist_id: playlist.id,
                created: true,
                added: desired.len(),
                duplicates_removed,
            })
        }
        Some(playlist) => {
            service
                .update_playlist_metadata(&playlist.id, name, false, description)
                .await?;
            debug!("Updating existing playlist '{}' ({})", name, playlist.id);

            let pb = progress_bar(desired.len() as u64, "Checking tracks");
            let mut added = 0;
            for uri in &desired {
                if !playlist_contains(service, &playlist.id, uri).await? {
                    service
                        .add_items(&playlist.id, std::slice::from_ref(uri))
                        .await?;
                    added += 1;
                }
                pb.inc(1);
            }
            pb.finish_and_clear();

            Ok(SyncReport {
                playlist_id: playlist.id,
                created: false,
                added,
                duplicates_removed,
            })
        }
    }
}

/// Looks for a playlist of the current user named exactly `name`.
pub async fn find_playlist(
    service: &dyn PlaylistService,
    name: &str,
) -> Res<Option<PlaylistSummary>> {
    let mut offset = 0;
    loop {
        let page = service.list_own_playlists(PAGE_SIZE, offset).await?;
        if page.is_empty() {
            return Ok(None);
        }
        if let Some(found) = page.iter().find(|p| p.name == name) {
            return Ok(Some(found.clone()));
        }
        offset += page.len() as u32;
    }
}

async fn playlist_contains(service: &dyn PlaylistService, playlist_id: &str, uri: &str) -> Res<bool> {
    let mut offset = 0;
    loop {
        let page = service
            .list_playlist_items(playlist_id, PAGE_SIZE, offset)
            .await?;
        if page.is_empty() {
            return Ok(false);
        }
        if page.iter().any(|item| item.track_uri.as_deref() == Some(uri)) {
            return Ok(true);
        }
        offset += page.len() as u32;
    }
}

fn progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.blue}] {pos}/{len}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ").progress_chars("=> "));
    }
    pb
}
