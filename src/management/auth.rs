use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{Res, credentials::Credentials, debug, spotify, types::Token};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Keeps the Spotify access token on disk and refreshes it when needed.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    /// Reads a token persisted by [`TokenManager::persist`].
    ///
    /// # Errors
    ///
    /// Fails with an I/O error if the file is missing and a JSON error if it
    /// does not hold a token.
    pub async fn load(path: &Path) -> Res<Self> {
        let content = async_fs::read_to_string(path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self {
            token,
            path: path.to_path_buf(),
        })
    }

    /// Writes the token as JSON, creating parent directories.
    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token that is valid for at least a few minutes,
    /// refreshing and persisting it first if necessary.
    pub async fn get_valid_token(&mut self, http: &Client, credentials: &Credentials) -> Res<String> {
        if self.is_expired() {
            debug!("Access token expired, refreshing");
            let mut token =
                spotify::auth::refresh_token(http, credentials, &self.token.refresh_token).await?;
            // Spotify may omit the refresh token when it is not rotated.
            if token.refresh_token.is_empty() {
                token.refresh_token = self.token.refresh_token.clone();
            }
            self.token = token;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    /// Whether the token expires within the refresh margin.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        let expires_at = self.token.obtained_at.saturating_add(self.token.expires_in);
        now >= expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    /// Whether the token was issued to the application identified by `client_id`.
    pub fn issued_to(&self, client_id: &str) -> bool {
        self.token.client_id == client_id
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
