use chrono::Utc;
use tunefind_playlist::{management::TokenManager, types::Token};

fn token(obtained_at: u64, expires_in: u64) -> Token {
    Token {
        access_token: "BQC-access".to_string(),
        refresh_token: "AQD-refresh".to_string(),
        scope: "playlist-modify-private playlist-read-private".to_string(),
        expires_in,
        obtained_at,
        client_id: "0123456789abcdef0123456789abcdef".to_string(),
    }
}

#[tokio::test]
async fn test_persist_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache").join("token.json");
    let now = Utc::now().timestamp() as u64;

    TokenManager::new(token(now, 3600), path.clone())
        .persist()
        .await
        .unwrap();
    let loaded = TokenManager::load(&path).await.unwrap();

    assert_eq!(loaded.current_token().access_token, "BQC-access");
    assert_eq!(loaded.current_token().refresh_token, "AQD-refresh");
    assert_eq!(loaded.current_token().obtained_at, now);
    assert!(loaded.issued_to("0123456789abcdef0123456789abcdef"));
    assert!(!loaded.issued_to("another-client"));
}

#[tokio::test]
async fn test_load_missing_token_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(TokenManager::load(&dir.path().join("token.json")).await.is_err());
}

#[test]
fn test_expiry_includes_margin() {
    let now = Utc::now().timestamp() as u64;
    let dir = std::env::temp_dir();

    let fresh = TokenManager::new(token(now, 3600), dir.join("unused.json"));
    assert!(!fresh.is_expired());

    // expires in three minutes, inside the refresh margin
    let almost = TokenManager::new(token(now - 3420, 3600), dir.join("unused.json"));
    assert!(almost.is_expired());

    let old = TokenManager::new(token(now - 7200, 3600), dir.join("unused.json"));
    assert!(old.is_expired());

    let short_lived = TokenManager::new(token(now, 60), dir.join("unused.json"));
    assert!(short_lived.is_expired());
}

#[test]
fn test_corrupted_expiry_does_not_overflow() {
    let dir = std::env::temp_dir();

    let corrupted = TokenManager::new(token(u64::MAX - 10, 3600), dir.join("unused.json"));
    assert!(!corrupted.is_expired());
}
