use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Tunefind media categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Show,
    Movie,
    Game,
}

impl MediaType {
    /// Every media type, in the order the catalog is probed.
    pub const ALL: [MediaType; 3] = [MediaType::Show, MediaType::Movie, MediaType::Game];

    /// Returns the media type matching `value` case-insensitively, ignoring
    /// surrounding whitespace, or `None`.
    pub fn read_in(value: &str) -> Option<MediaType> {
        let value = value.trim();
        MediaType::ALL
            .into_iter()
            .find(|t| t.translate().eq_ignore_ascii_case(value))
    }

    /// Canonical lowercase representation, as used in Tunefind URLs and the cache.
    pub fn translate(self) -> &'static str {
        match self {
            MediaType::Show => "show",
            MediaType::Movie => "movie",
            MediaType::Game => "game",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.translate())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::read_in(s).ok_or_else(|| {
            format!("invalid value '{}'. Valid values: show, movie, game", s.trim())
        })
    }
}

/// A single song as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Catalog id of the song, unique across the catalog.
    pub id: String,
    pub name: String,
    /// Spotify track URI, empty when it could not be resolved.
    pub spotify: String,
    /// Comma-separated artist names.
    pub artists: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub id: String,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub name: String,
    pub id: String,
    pub episodes: Vec<Episode>,
}

/// Songs of a media, either grouped into seasons and episodes or flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaContent {
    Show { seasons: Vec<Season> },
    Songs { songs: Vec<Song> },
}

/// Normalized record produced by the catalog client and consumed by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Lowercase, hyphenated catalog key, e.g. `the-mocks`.
    pub media_name: String,
    pub media_type: MediaType,
    /// Display name, e.g. `The Mocks`.
    pub readable_name: String,
    #[serde(flatten)]
    pub content: MediaContent,
}

impl MediaRecord {
    pub fn song_count(&self) -> usize {
        match &self.content {
            MediaContent::Show { seasons } => seasons
                .iter()
                .flat_map(|s| s.episodes.iter())
                .map(|e| e.songs.len())
                .sum(),
            MediaContent::Songs { songs } => songs.len(),
        }
    }

    pub fn episode_count(&self) -> usize {
        match &self.content {
            MediaContent::Show { seasons } => seasons.iter().map(|s| s.episodes.len()).sum(),
            MediaContent::Songs { .. } => 0,
        }
    }
}

/// Cached media as listed by the `list` command.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MediaSummary {
    pub media_name: String,
    pub readable_name: String,
    pub media_type: String,
    pub last_updated: i64,
    pub song_count: i64,
}

#[derive(Tabled)]
pub struct MediaTableRow {
    pub name: String,
    pub title: String,
    #[tabled(rename = "type")]
    pub media_type: String,
    pub songs: i64,
    pub updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
    /// Client id the token was issued to.
    #[serde(default)]
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

/// Identifier and name of a remote playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<PlaylistSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePlaylistDetailsRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

/// One entry of a remote playlist. Local files and removed tracks have no URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPlaylistItemsResponse {
    pub items: Vec<PlaylistTrackEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackEntry {
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
