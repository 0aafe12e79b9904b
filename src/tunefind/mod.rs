//! Tunefind catalog client.
//!
//! Uses Tunefind's undocumented frontend API to list the songs of a show,
//! movie or game. Spotify links on Tunefind are short-lived redirects, so
//! they are resolved to track URIs while scraping.

mod dto;

use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use serde_json::Value;

use crate::{
    Error, Res, config, debug, info,
    types::{Episode, MediaContent, MediaRecord, MediaType, Season, Song},
    utils,
};

use dto::{EpisodeResponse, SeasonListResponse, SeasonResponse, SongEvent};

/// Source of normalized media records.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Resolves `name` to a complete record. Without `media_type`, or when the
    /// given type does not exist, every type is probed in order.
    async fn resolve(&self, name: &str, media_type: Option<MediaType>) -> Res<MediaRecord>;
}

/// [`CatalogClient`] backed by Tunefind's frontend API.
///
/// Uses two HTTP clients: one for API requests and one that does not follow
/// redirects, so the `Location` of a Spotify forward link can be read.
pub struct TunefindClient {
    http: Client,
    /// Client that does not follow redirects, for resolving Spotify links.
    links: Client,
    api_url: String,
    base_url: String,
}

impl TunefindClient {
    /// Creates a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if an HTTP client cannot be built.
    pub fn new() -> Res<Self> {
        let http = Client::builder()
            .timeout(config::http_timeout())
            .user_agent(config::user_agent())
            .build()?;
        Self::with_http_client(http)
    }

    /// Like [`TunefindClient::new`], with a custom client for API requests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the redirect client cannot be built.
    pub fn with_http_client(http: Client) -> Res<Self> {
        let links = Client::builder()
            .timeout(config::http_timeout())
            .user_agent(config::user_agent())
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            http,
            links,
            api_url: config::tunefind_apiurl().trim_end_matches('/').to_string(),
            base_url: config::tunefind_base_url().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_json(&self, url: &str) -> Res<Value> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        debug!("Response {} for request to {}", status.as_u16(), url);

        if !status.is_success() {
            return Err(Error::RemoteService {
                status: status.as_u16(),
                message: format!("request to {} failed", url),
            });
        }

        parse_body(url, &response.text().await?)
    }

    async fn resource_exists(&self, name: &str, media_type: MediaType) -> Res<bool> {
        let url = format!("{}/{}/{}", self.api_url, media_type, name);
        debug!("Probing media type '{}': {}", media_type, url);
        let response = self.http.get(&url).send().await?;
        Ok(response.status() == StatusCode::OK)
    }

    async fn infer_media_type(&self, name: &str) -> Res<MediaType> {
        for media_type in MediaType::ALL {
            if self.resource_exists(name, media_type).await? {
                return Ok(media_type);
            }
        }
        Err(Error::MediaNotFound(name.to_string()))
    }

    /// Follows a Tunefind forward link one step. Returns the Spotify track URI
    /// or an empty string if the link does not redirect.
    async fn resolve_spotify_link(&self, link: &str) -> Res<String> {
        let url = if link.starts_with("http") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link)
        };

        let response = self.links.get(&url).send().await?;
        if response.status() != StatusCode::FOUND {
            debug!("No redirect for url '{}'", url);
            return Ok(String::new());
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let uri = track_uri_from_url(location);
        debug!("Replaced forward link '{}' -> '{}'", url, uri);
        Ok(uri)
    }

    async fn convert_songs(&self, events: Vec<SongEvent>, label: &str) -> Res<Vec<Song>> {
        let pb = progress_bar(events.len() as u64, label);
        let mut songs = Vec::with_capacity(events.len());
        for event in events {
            let song = event.song;
            let spotify = match song.spotify.as_deref() {
                Some(link) if !link.is_empty() => self.resolve_spotify_link(link).await?,
                _ => String::new(),
            };
            songs.push(Song {
                id: dto::id_to_string(&song.id),
                name: song.name,
                spotify,
                artists: song
                    .artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(songs)
    }

    async fn scrape_show(&self, name: &str) -> Res<MediaRecord> {
        let main = self
            .fetch_json(&format!("{}/show/{}?fields=seasons", self.api_url, name))
            .await?;
        let readable_name = readable_name(&main, MediaType::Show, name);
        let listing: SeasonListResponse = serde_json::from_value(main)?;

        let mut seasons = Vec::with_capacity(listing.seasons.len());
        for season_number in 1..=listing.seasons.len() {
            let season: SeasonResponse = serde_json::from_value(
                self.fetch_json(&format!(
                    "{}/show/{}/season/{}?fields=episodes",
                    self.api_url, name, season_number
                ))
                .await?,
            )?;

            let mut episodes = Vec::with_capacity(season.episodes.len());
            for (idx, episode_ref) in season.episodes.iter().enumerate() {
                let episode_id = dto::id_to_string(&episode_ref.id);
                let episode: EpisodeResponse = serde_json::from_value(
                    self.fetch_json(&format!(
                        "{}/episode/{}?fields=song-events",
                        self.api_url, episode_id
                    ))
                    .await?,
                )?;
                let label = format!("Scraping season {} episode {}", season_number, idx + 1);
                let songs = self.convert_songs(episode.episode.song_events, &label).await?;
                episodes.push(Episode {
                    name: format!("Episode {}", idx + 1),
                    id: episode_id,
                    songs,
                });
            }

            seasons.push(Season {
                name: format!("Season {}", season_number),
                id: format!("season/{}", season_number),
                episodes,
            });
        }

        let record = MediaRecord {
            media_name: name.to_string(),
            media_type: MediaType::Show,
            readable_name,
            content: MediaContent::Show { seasons },
        };
        info!(
            "Found {} seasons, {} episodes, {} songs in total.",
            match &record.content {
                MediaContent::Show { seasons } => seasons.len(),
                MediaContent::Songs { .. } => 0,
            },
            record.episode_count(),
            record.song_count()
        );
        Ok(record)
    }

    async fn scrape_songs(&self, name: &str, media_type: MediaType) -> Res<MediaRecord> {
        let main = self
            .fetch_json(&format!(
                "{}/{}/{}?fields=song-events",
                self.api_url, media_type, name
            ))
            .await?;
        let readable_name = readable_name(&main, media_type, name);
        let events: Vec<SongEvent> = match main.get("song_events") {
            Some(events) => serde_json::from_value(events.clone())?,
            None => Vec::new(),
        };
        let songs = self.convert_songs(events, "Scraping songs").await?;
        info!("Found {} songs in total.", songs.len());

        Ok(MediaRecord {
            media_name: name.to_string(),
            media_type,
            readable_name,
            content: MediaContent::Songs { songs },
        })
    }
}

#[async_trait]
impl CatalogClient for TunefindClient {
    async fn resolve(&self, name: &str, media_type: Option<MediaType>) -> Res<MediaRecord> {
        let name = utils::normalize_media_name(name);

        let media_type = match media_type {
            Some(t) if self.resource_exists(&name, t).await? => t,
            Some(t) => {
                info!("No media found for type '{}'.", t);
                self.infer_media_type(&name).await?
            }
            None => {
                info!("No media type given, will be inferred.");
                self.infer_media_type(&name).await?
            }
        };
        info!("Verified existence of media '{}' with type '{}'.", name, media_type);
        info!("Scraping '{}' from Tunefind ...", name);

        match media_type {
            MediaType::Show => self.scrape_show(&name).await,
            MediaType::Movie | MediaType::Game => self.scrape_songs(&name, media_type).await,
        }
    }
}

/// Display name from the top-level object of a media response, falling back
/// to the catalog key.
fn readable_name(main: &Value, media_type: MediaType, fallback: &str) -> String {
    main.get(media_type.translate())
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Parses a response body, rejecting blank bodies and JSON without data.
fn parse_body(url: &str, body: &str) -> Res<Value> {
    if body.trim().is_empty() {
        return Err(Error::EmptyUpstreamResponse(url.to_string()));
    }
    let value: Value = serde_json::from_str(body)?;
    if dto::is_empty(&value) {
        return Err(Error::EmptyUpstreamResponse(url.to_string()));
    }
    Ok(value)
}

/// Converts `https://open.spotify.com/track/<id>?si=..` into `spotify:track:<id>`.
/// Anything that is not a track URL yields an empty string.
pub fn track_uri_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.trim_end_matches('/').rsplit('/');
    match (segments.next(), segments.next()) {
        (Some(id), Some("track")) if !id.is_empty() => format!("spotify:track:{}", id),
        _ => String::new(),
    }
}

fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.blue}] {pos}/{len}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ").progress_chars("=> "));
    }
    pb
}
