//! Configuration management for the Tunefind playlist tool.
//!
//! Values are read from the process environment, which is first populated
//! from a `.env` file in the local data directory. Every accessor falls back
//! to a sensible default so that a fresh installation works without any
//! configuration besides Spotify credentials.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::Res;

/// Name of the application directory below the platform data directory.
pub const APP_DIR: &str = "tunefind-playlist";

/// Returns the application directory inside the platform-specific local data
/// directory.
///
/// - Linux: `~/.local/share/tunefind-playlist`
/// - macOS: `~/Library/Application Support/tunefind-playlist`
/// - Windows: `%LOCALAPPDATA%/tunefind-playlist`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from the `.env` file in the data directory.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is
/// not an error; variables already present in the process environment take
/// precedence over the file.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Res<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| crate::Error::config(format!("{}: {}", path.display(), e)))?;
    }

    Ok(())
}

fn var_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// Base URL of the Spotify Web API, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Spotify OAuth authorization endpoint.
pub fn spotify_apiauth_url() -> String {
    var_or(
        "SPOTIFY_API_AUTH_URL",
        "https://accounts.spotify.com/authorize",
    )
}

/// Spotify OAuth token endpoint used for code exchange and refresh.
pub fn spotify_apitoken_url() -> String {
    var_or(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Scopes requested during authorization. Only private playlists are created.
pub fn spotify_scope() -> String {
    var_or(
        "SPOTIFY_API_AUTH_SCOPE",
        "playlist-modify-private playlist-read-private",
    )
}

/// Base URL of the Tunefind frontend API.
pub fn tunefind_apiurl() -> String {
    var_or("TUNEFIND_API_URL", "https://www.tunefind.com/api/frontend")
}

/// Public Tunefind site, used for links in playlist descriptions and for
/// resolving relative song links.
pub fn tunefind_base_url() -> String {
    var_or("TUNEFIND_BASE_URL", "https://www.tunefind.com")
}

/// Location of the SQLite cache. Defaults to `cache.db` in the data directory.
pub fn database_path() -> PathBuf {
    match env::var("T2S_DATABASE") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_dir().join("cache.db"),
    }
}

/// Timeout applied to every outgoing HTTP request.
pub fn http_timeout() -> Duration {
    let secs = env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(30);
    Duration::from_secs(secs)
}

/// Whether `T2S_VERBOSE` asks for diagnostic output.
pub fn verbose() -> bool {
    matches!(
        env::var("T2S_VERBOSE").as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

pub fn token_path() -> PathBuf {
    data_dir().join("cache").join("token.json")
}

/// Default credentials file, read when no inline credentials are given.
pub fn credentials_path() -> PathBuf {
    data_dir().join("credentials")
}

/// User agent sent to both remote services.
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
