//! Top-level operations combining the catalog, the cache and the playlist
//! service.

use crate::{
    Res, info,
    playlist::{self, PlaylistService, SyncReport},
    store::CacheStore,
    success,
    tunefind::CatalogClient,
    types::{MediaRecord, MediaType},
    utils, warning,
};

/// Scrapes `name` from the catalog and stores the result in the cache.
///
/// If the media is shown on Tunefind under an URL such as
/// `https://www.tunefind.com/game/assassins-creed-valhalla-2020`, its name is
/// `assassins-creed-valhalla-2020` and its type [`MediaType::Game`].
pub async fn fetch(
    store: &CacheStore,
    catalog: &dyn CatalogClient,
    name: &str,
    media_type: Option<MediaType>,
) -> Res<MediaRecord> {
    let record = catalog.resolve(name, media_type).await?;
    store.insert_data(&record).await?;
    success!(
        "Cached '{}' ({}) with {} songs",
        record.readable_name,
        record.media_type,
        record.song_count()
    );
    Ok(record)
}

/// Creates or updates the playlist for a cached media.
///
/// Returns `Ok(None)` without contacting the playlist service if the media
/// was never fetched. For shows, `season` limits the playlist to one season
/// and names it `"<title> - Season <n>"`; for other media it is ignored.
pub async fn export(
    store: &CacheStore,
    service: &dyn PlaylistService,
    name: &str,
    season: Option<u32>,
) -> Res<Option<SyncReport>> {
    let name = utils::normalize_media_name(name);
    if !store.media_exists(&name).await? {
        warning!(
            "Media '{}' does not exist in cache. Please fetch first.",
            name
        );
        return Ok(None);
    }

    let readable_name = store.get_readable_name(&name).await?;
    let (playlist_name, uris) = match store.get_media_type(&name).await? {
        MediaType::Show => {
            let uris = store.get_track_uris_for_show(&name, season).await?;
            let playlist_name = match season {
                Some(season) => format!("{} - Season {}", readable_name, season),
                None => readable_name,
            };
            (playlist_name, uris)
        }
        media_type @ (MediaType::Movie | MediaType::Game) => {
            if season.is_some() {
                warning!(
                    "'{}' is a {} and has no seasons, exporting all songs.",
                    name,
                    media_type
                );
            }
            (readable_name, store.get_track_uris_for_media(&name).await?)
        }
    };

    let description = store.get_playlist_description(&name).await?;
    info!(
        "Exporting {} tracks to playlist '{}'",
        uris.len(),
        playlist_name
    );

    let report = playlist::synchronize(service, &playlist_name, uris, &description).await?;
    if report.created {
        success!(
            "Created playlist '{}' with {} tracks",
            playlist_name,
            report.added
        );
    } else {
        success!(
            "Updated playlist '{}', added {} new tracks",
            playlist_name,
            report.added
        );
    }
    Ok(Some(report))
}

/// Fetches `name` and exports it. A failing export leaves the fetched data
/// cached, so the export can be repeated on its own.
pub async fn create_playlist(
    store: &CacheStore,
    catalog: &dyn CatalogClient,
    service: &dyn PlaylistService,
    name: &str,
    media_type: Option<MediaType>,
    season: Option<u32>,
) -> Res<Option<SyncReport>> {
    let record = fetch(store, catalog, name, media_type).await?;
    export(store, service, &record.media_name, season).await
}
