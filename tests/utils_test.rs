use tunefind_playlist::utils::*;

#[test]
fn test_normalize_media_name() {
    assert_eq!(normalize_media_name("The Mocks"), "the-mocks");
    assert_eq!(normalize_media_name("mockies_adventures"), "mockies-adventures");
    assert_eq!(normalize_media_name("  Grey's Anatomy "), "grey's-anatomy");

    // already normalized names pass through unchanged
    assert_eq!(
        normalize_media_name("assassins-creed-valhalla-2020"),
        "assassins-creed-valhalla-2020"
    );
}

#[test]
fn test_dedup_preserving_order() {
    let input: Vec<String> = ["c", "a", "c", "b", "a", "c"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let (unique, removed) = dedup_preserving_order(input);

    assert_eq!(unique, vec!["c", "a", "b"]);
    assert_eq!(removed, 3);
}

#[test]
fn test_dedup_without_duplicates() {
    let (unique, removed) = dedup_preserving_order(vec!["x".to_string()]);
    assert_eq!(unique, vec!["x"]);
    assert_eq!(removed, 0);

    let (unique, removed) = dedup_preserving_order(Vec::new());
    assert!(unique.is_empty());
    assert_eq!(removed, 0);
}

#[test]
fn test_format_timestamp() {
    assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 64);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated values should be different
    assert_ne!(state, generate_state());
}
