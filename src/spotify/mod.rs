//! # Spotify Integration Module
//!
//! Implements [`PlaylistService`] on top of the Spotify Web API.
//!
//! ## Endpoints
//!
//! - `GET /me` - id of the authorized user
//! - `GET /me/playlists` - the user's playlists, paginated
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `PUT /playlists/{playlist_id}` - change name, visibility and description
//! - `GET /playlists/{playlist_id}/tracks` - playlist items, paginated
//! - `POST /playlists/{playlist_id}/tracks` - add tracks
//!
//! ## Authentication
//!
//! [`auth`] implements the Authorization Code flow with the client secret.
//! The resulting token is kept by [`TokenManager`] and loaded on the first
//! API call, so constructing a [`SpotifyClient`] performs no I/O. Requests
//! are never retried; any non-success status becomes
//! [`Error::RemoteService`].

pub mod auth;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    Error, Res, config,
    credentials::Credentials,
    debug,
    management::TokenManager,
    playlist::PlaylistService,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, ChangePlaylistDetailsRequest,
        CreatePlaylistRequest, CurrentUserResponse, GetPlaylistItemsResponse,
        GetUserPlaylistsResponse, PlaylistItem, PlaylistSummary,
    },
    warning,
};

/// Builds the HTTP client shared by the remote services.
pub fn http_client() -> Res<Client> {
    Ok(Client::builder()
        .timeout(config::http_timeout())
        .user_agent(config::user_agent())
        .build()?)
}

/// Turns non-success responses into [`Error::RemoteService`], extracting the
/// message from Spotify's error body when there is one.
pub(crate) async fn check_response(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error_description"].as_str())
                .or_else(|| v["error"].as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);

    Err(Error::RemoteService {
        status: status.as_u16(),
        message,
    })
}

/// [`PlaylistService`] backed by the Spotify Web API.
///
/// Authorization happens lazily on the first request that needs a token.
pub struct SpotifyClient {
    http: Client,
    credentials: Credentials,
    api_url: String,
    tokens: Mutex<Option<TokenManager>>,
}

impl SpotifyClient {
    /// Creates a client for the given application credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new(credentials: Credentials) -> Res<Self> {
        Ok(Self::with_http_client(credentials, http_client()?))
    }

    /// Like [`SpotifyClient::new`], with a preconfigured HTTP client.
    pub fn with_http_client(credentials: Credentials, http: Client) -> Self {
        Self {
            http,
            credentials,
            api_url: config::spotify_apiurl().trim_end_matches('/').to_string(),
            tokens: Mutex::new(None),
        }
    }

    /// Returns a valid access token, authorizing interactively when no
    /// usable token is cached.
    async fn access_token(&self) -> Res<String> {
        let mut guard = self.tokens.lock().await;

        if guard.is_none() {
            let path = config::token_path();
            let cached = match TokenManager::load(&path).await {
                Ok(manager) if manager.issued_to(&self.credentials.client_id) => Some(manager),
                Ok(_) => {
                    warning!("Cached token belongs to different credentials, authorizing again.");
                    None
                }
                Err(e) => {
                    debug!("No usable cached token ({})", e);
                    None
                }
            };

            let manager = match cached {
                Some(manager) => manager,
                None => {
                    let token = auth::authorize(&self.http, &self.credentials).await?;
                    let manager = TokenManager::new(token, path);
                    manager.persist().await?;
                    manager
                }
            };
            *guard = Some(manager);
        }

        match guard.as_mut() {
            Some(manager) => manager.get_valid_token(&self.http, &self.credentials).await,
            None => Err(Error::auth("no access token available")),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Res<Response> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        check_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Res<T> {
        Ok(self.send(request).await?.json::<T>().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[async_trait]
impl PlaylistService for SpotifyClient {
    async fn current_user_id(&self) -> Res<String> {
        let me: CurrentUserResponse = self.get_json(self.http.get(self.url("/me"))).await?;
        Ok(me.id)
    }

    async fn list_own_playlists(&self, limit: u32, offset: u32) -> Res<Vec<PlaylistSummary>> {
        let request = self
            .http
            .get(self.url("/me/playlists"))
            .query(&[("limit", limit), ("offset", offset)]);
        let page: GetUserPlaylistsResponse = self.get_json(request).await?;
        Ok(page.items)
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Res<PlaylistSummary> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };
        let request = self
            .http
            .post(self.url(&format!("/users/{}/playlists", owner_id)))
            .json(&body);
        self.get_json(request).await
    }

    async fn update_playlist_metadata(
        &self,
        playlist_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Res<()> {
        let body = ChangePlaylistDetailsRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };
        let request = self
            .http
            .put(self.url(&format!("/playlists/{}", playlist_id)))
            .json(&body);
        self.send(request).await?;
        Ok(())
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Res<Vec<PlaylistItem>> {
        let request = self
            .http
            .get(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .query(&[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("fields", "items(track(uri))".to_string()),
            ]);
        let page: GetPlaylistItemsResponse = self.get_json(request).await?;

        Ok(page
            .items
            .into_iter()
            .map(|entry| PlaylistItem {
                track_uri: entry.track.and_then(|t| t.uri),
            })
            .collect())
    }

    async fn add_items(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let request = self
            .http
            .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .json(&body);
        let response: AddTrackToPlaylistResponse = self.get_json(request).await?;
        debug!(
            "Added {} tracks to {} (snapshot {})",
            uris.len(),
            playlist_id,
            response.snapshot_id
        );
        Ok(())
    }
}
