//! Application-wide error types.
//!
//! Every fallible operation in the library returns [`Res`]. Errors are never
//! retried or suppressed inside the library; the command-line layer reports
//! them once and exits with a non-zero status.

/// A convenient Result type alias for operations that may fail.
pub type Res<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No credential source could be found.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// A credential source was found but its content is malformed.
    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The catalog has no media of any type under this name.
    #[error("No media could be found for name '{0}'. Typo?")]
    MediaNotFound(String),

    /// The catalog answered with an empty document.
    #[error("Empty response returned from request to {0}")]
    EmptyUpstreamResponse(String),

    /// Database error
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A season filter that matches no episode of the show.
    #[error("Season {season} is out of range for '{media}', {available} seasons are cached")]
    SeasonOutOfRange {
        media: String,
        season: u32,
        available: u32,
    },

    /// Lookup of a media name that is not cached.
    #[error("Media '{0}' does not exist in cache")]
    UnknownMedia(String),

    /// A media record whose type and content disagree.
    #[error("Invalid media record for '{media}': {message}")]
    InvalidRecord { media: String, message: String },

    /// A uniqueness invariant of the cache does not hold.
    #[error("Cache is inconsistent: {0}")]
    Inconsistent(String),

    /// The playlist service rejected a request.
    #[error("Remote service error ({status}): {message}")]
    RemoteService { status: u16, message: String },

    /// Network or HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// OAuth authorization failed.
    #[error("Authorization error: {0}")]
    Auth(String),
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an authorization error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid record error.
    pub fn invalid_record(media: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            media: media.into(),
            message: message.into(),
        }
    }
}
