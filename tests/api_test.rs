mod common;

use std::sync::atomic::Ordering;

use common::*;
use tunefind_playlist::{Error, api, types::MediaType};

#[tokio::test]
async fn test_export_of_unknown_media_is_a_soft_no_op() {
    let (_dir, _path, store) = temp_store().await;
    let service = FakePlaylistService::new();

    let report = api::export(&store, &service, "Never Fetched", None)
        .await
        .unwrap();

    assert!(report.is_none());
    assert_eq!(service.remote_calls(), 0);
}

#[tokio::test]
async fn test_fetch_stores_record() {
    let (_dir, _path, store) = temp_store().await;
    let catalog = FakeCatalog::with(vec![mock_show()]);

    let record = api::fetch(&store, &catalog, "The Mocks", None).await.unwrap();

    assert_eq!(record.media_name, SHOW_NAME);
    assert!(store.media_exists(SHOW_NAME).await.unwrap());
    assert_eq!(store.get_media_type(SHOW_NAME).await.unwrap(), MediaType::Show);
}

#[tokio::test]
async fn test_fetch_unknown_media_fails() {
    let (_dir, _path, store) = temp_store().await;
    let catalog = FakeCatalog::with(vec![]);

    let err = api::fetch(&store, &catalog, "Typo Show", None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MediaNotFound(name) if name == "typo-show"));
    assert!(store.list_media().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_show_creates_playlist() {
    let (_dir, _path, store) = temp_store().await;
    store.insert_data(&mock_show()).await.unwrap();
    let service = FakePlaylistService::new();

    let report = api::export(&store, &service, "The Mocks", None)
        .await
        .unwrap()
        .unwrap();

    assert!(report.created);
    assert_eq!(report.added, 4);
    let playlist = service.playlist("The Mocks").unwrap();
    assert!(playlist.description.contains("tunefind.com/show/the-mocks"));
    assert_eq!(service.items("The Mocks").len(), 4);
}

#[tokio::test]
async fn test_export_single_season() {
    let (_dir, _path, store) = temp_store().await;
    store.insert_data(&mock_show()).await.unwrap();
    let service = FakePlaylistService::new();

    let report = api::export(&store, &service, SHOW_NAME, Some(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.added, 4);
    assert!(service.playlist("The Mocks - Season 1").is_some());
    assert!(service.playlist("The Mocks").is_none());
}

#[tokio::test]
async fn test_export_missing_season_fails_before_remote_calls() {
    let (_dir, _path, store) = temp_store().await;
    store.insert_data(&mock_show()).await.unwrap();
    let service = FakePlaylistService::new();

    let err = api::export(&store, &service, SHOW_NAME, Some(5))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SeasonOutOfRange {
            season: 5,
            available: 2,
            ..
        }));
    assert_eq!(service.remote_calls(), 0);
}

#[tokio::test]
async fn test_export_movie_ignores_season() {
    let (_dir, _path, store) = temp_store().await;
    store.insert_data(&mock_movie()).await.unwrap();
    let service = FakePlaylistService::new();

    let report = api::export(&store, &service, MOVIE_NAME, Some(2))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.added, 4);
    assert_eq!(service.items("Mockies Adventures").len(), 4);
}

#[tokio::test]
async fn test_create_playlist_fetches_then_exports() {
    let (_dir, _path, store) = temp_store().await;
    let catalog = FakeCatalog::with(vec![mock_game()]);
    let service = FakePlaylistService::new();

    let report = api::create_playlist(
        &store,
        &catalog,
        &service,
        "Mockricilious",
        Some(MediaType::Game),
        None,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(catalog.resolved.load(Ordering::SeqCst), 1);
    assert!(store.media_exists(GAME_NAME).await.unwrap());
    assert!(report.created);
    assert_eq!(service.items("Mockricilious").len(), 4);
}

#[tokio::test]
async fn test_failed_export_keeps_fetched_data() {
    let (_dir, _path, store) = temp_store().await;
    let catalog = FakeCatalog::with(vec![mock_movie()]);
    let failing = FakePlaylistService::failing_add();

    let err = api::create_playlist(&store, &catalog, &failing, MOVIE_NAME, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RemoteService { .. }));
    assert!(store.media_exists(MOVIE_NAME).await.unwrap());

    // export alone can be retried without fetching again
    let service = FakePlaylistService::new();
    let report = api::export(&store, &service, MOVIE_NAME, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.added, 4);
    assert_eq!(catalog.resolved.load(Ordering::SeqCst), 1);
}
