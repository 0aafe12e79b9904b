use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct SeasonListResponse {
    #[serde(default)]
    pub seasons: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonResponse {
    #[serde(default)]
    pub episodes: Vec<EpisodeRef>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeRef {
    pub id: Value,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeResponse {
    pub episode: EpisodeSongEvents,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeSongEvents {
    #[serde(default)]
    pub song_events: Vec<SongEvent>,
}

#[derive(Debug, Deserialize)]
pub struct SongEvent {
    pub song: SongDto,
}

#[derive(Debug, Deserialize)]
pub struct SongDto {
    pub id: Value,
    pub name: String,
    /// Site-relative link that redirects to the Spotify track.
    #[serde(default)]
    pub spotify: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistDto>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistDto {
    pub name: String,
}

/// Renders a JSON id, which Tunefind sends as a number or a string.
pub fn id_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whether a response body carries no data at all.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
