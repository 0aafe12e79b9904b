//! Tunefind Playlist Library
//!
//! This library fetches soundtrack listings for shows, movies and games from
//! Tunefind, caches them in a local SQLite database and turns the cached data
//! into Spotify playlists.
//!
//! # Modules
//!
//! - `api` - Top-level operations: fetch, export and create_playlist
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `credentials` - Discovery and validation of Spotify API credentials
//! - `error` - Error type shared by all modules
//! - `management` - Token persistence
//! - `playlist` - Playlist service capabilities and the synchronizer
//! - `spotify` - Spotify Web API client implementation
//! - `store` - Local SQLite cache of media, songs and episodes
//! - `tunefind` - Tunefind catalog client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tunefind_playlist::{api, config, store::CacheStore, tunefind::TunefindClient};
//!
//! #[tokio::main]
//! async fn main() -> tunefind_playlist::Res<()> {
//!     config::load_env().await?;
//!     let store = CacheStore::open(&config::database_path()).await?;
//!     let catalog = TunefindClient::new()?;
//!     api::fetch(&store, &catalog, "The Mocks", None).await?;
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

pub mod api;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod management;
pub mod playlist;
pub mod spotify;
pub mod store;
pub mod tunefind;
pub mod types;
pub mod utils;

pub use error::{Error, Res};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enables or disables output of the [`debug!`] macro.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Returns whether [`debug!`] output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Scraping '{}' from Tunefind ...", media_name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Created new playlist '{}'", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only the command-line layer uses
/// this macro; library code returns [`Error`] values instead.
///
/// # Example
///
/// ```
/// error!("Cannot open cache database. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice, e.g. exporting media that was never fetched.
///
/// # Example
///
/// ```
/// warning!("Media '{}' does not exist in cache. Please fetch first.", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic message when verbose output is enabled.
///
/// # Example
///
/// ```
/// debug!("Probing media type '{}': {}", media_type, url);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::is_verbose() {
      use colored::Colorize;
      println!("[{}] {}", ".".dimmed(), std::format_args!($($arg)*));
    }
  })
}
