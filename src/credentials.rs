//! Discovery and validation of Spotify API credentials.
//!
//! Credentials are looked up in three places, highest priority first:
//! environment variables, an inline `ID|SECRET|URI` argument and the first
//! line of a credentials file.

use std::{env, fmt, path::Path};

use crate::{Error, Res, config, debug};

pub const ENV_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_REDIRECT_URI";

pub const DEFAULT_DELIMITER: &str = "|";

const KEY_LENGTH: usize = 32;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible = self
            .client_secret
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| &self.client_secret[i..])
            .unwrap_or("");
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &format!("****{}", visible))
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

fn is_key(value: &str) -> bool {
    value.len() == KEY_LENGTH && value.chars().all(|c| c.is_ascii_alphanumeric())
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Client id and secret must be 32 alphanumeric characters and the
    /// redirect URI must use https.
    pub fn is_valid(&self) -> bool {
        is_key(&self.client_id)
            && is_key(&self.client_secret)
            && self.redirect_uri.starts_with("https://")
    }

    /// Parses a single `ID<delim>SECRET<delim>URI` line. Returns `None` unless
    /// it has exactly three parts.
    pub fn parse(line: &str, delimiter: char) -> Option<Self> {
        let parts: Vec<&str> = line.trim().split(delimiter).map(str::trim).collect();
        match parts.as_slice() {
            [id, secret, uri] => Some(Self::new(*id, *secret, *uri)),
            _ => None,
        }
    }
}

/// Resolves credentials from the process environment, `arg` or the default
/// credentials file.
pub fn resolve(arg: Option<&str>, delimiter: &str) -> Res<Credentials> {
    resolve_with(
        |key| env::var(key).ok().filter(|v| !v.trim().is_empty()),
        arg,
        delimiter,
    )
}

/// Like [`resolve`], with a custom environment lookup.
///
/// `arg` is first tried as an inline credential string and then as a path to
/// a credentials file. Without an argument the default file from
/// [`config::credentials_path`] is used.
pub fn resolve_with<F>(env_lookup: F, arg: Option<&str>, delimiter: &str) -> Res<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let mut chars = delimiter.chars();
    let delimiter = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(Error::config(format!(
                "credential delimiter must be a single character, got '{}'",
                delimiter
            )));
        }
    };

    if let (Some(id), Some(secret), Some(uri)) = (
        env_lookup(ENV_CLIENT_ID),
        env_lookup(ENV_CLIENT_SECRET),
        env_lookup(ENV_REDIRECT_URI),
    ) {
        debug!("Using credentials from environment variables");
        let creds = Credentials::new(id.trim(), secret.trim(), uri.trim());
        if creds.is_valid() {
            return Ok(creds);
        }
        return Err(Error::InvalidCredentialFormat(format!(
            "environment variables {}, {} and {} are set but not valid",
            ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_REDIRECT_URI
        )));
    }

    if let Some(arg) = arg {
        if let Some(creds) = Credentials::parse(arg, delimiter) {
            if creds.is_valid() {
                debug!("Using inline credentials");
                return Ok(creds);
            }
        }
    }

    let default_path = config::credentials_path();
    let path = arg.map(Path::new).unwrap_or(default_path.as_path());
    read_file(path, delimiter)
}

fn read_file(path: &Path, delimiter: char) -> Res<Credentials> {
    if !path.is_file() {
        return Err(Error::MissingCredentials(format!(
            "set {}, {} and {}, pass 'ID{d}SECRET{d}URI' or create {}",
            ENV_CLIENT_ID,
            ENV_CLIENT_SECRET,
            ENV_REDIRECT_URI,
            path.display(),
            d = delimiter
        )));
    }

    debug!("Using credentials file {}", path.display());
    let content = std::fs::read_to_string(path)?;
    let line = content.lines().next().unwrap_or_default();

    match Credentials::parse(line, delimiter) {
        Some(creds) if creds.is_valid() => Ok(creds),
        _ => Err(Error::InvalidCredentialFormat(format!(
            "first line of {} must be 'ID{d}SECRET{d}URI' with 32 character id and secret and an https redirect URI",
            path.display(),
            d = delimiter
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0123456789abcdef0123456789abcdef";
    const SECRET: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_parse_requires_three_parts() {
        assert!(Credentials::parse("a|b", '|').is_none());
        assert!(Credentials::parse("a|b|c|d", '|').is_none());
        let creds = Credentials::parse(&format!("{ID}|{SECRET}|https://x.org"), '|').unwrap();
        assert!(creds.is_valid());
    }

    #[test]
    fn test_debug_masks_secret() {
        let creds = Credentials::new(ID, SECRET, "https://example.org/callback");
        let out = format!("{:?}", creds);
        assert!(!out.contains(SECRET));
        assert!(out.contains("****3210"));
    }

    #[test]
    fn test_redirect_must_be_https() {
        let creds = Credentials::new(ID, SECRET, "http://localhost:8080");
        assert!(!creds.is_valid());
    }
}
