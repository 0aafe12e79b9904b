use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};

use crate::info;

/// Turns a user supplied media name into the catalog key, e.g.
/// `"The Mocks"` becomes `"the-mocks"`.
pub fn normalize_media_name(name: &str) -> String {
    let normalized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect();

    if normalized != name {
        info!("Normalized media name '{}' to '{}'", name, normalized);
    }

    normalized
}

/// Removes repeated entries, keeping the first occurrence of each. Returns the
/// remaining entries and the number of removed duplicates.
pub fn dedup_preserving_order(items: Vec<String>) -> (Vec<String>, usize) {
    let before = items.len();
    let mut seen = HashSet::new();
    let unique: Vec<String> = items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect();
    let removed = before - unique.len();
    (unique, removed)
}

pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => timestamp.to_string(),
    }
}

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}
