use std::path::Path;

use tabled::Table;

use crate::{error, info, types::MediaTableRow, utils};

pub async fn list(database: &Path) {
    let store = super::open_store(database).await;

    let media = match store.list_media().await {
        Ok(media) => media,
        Err(e) => error!("Failed to load cached media. Err: {}", e),
    };
    store.close().await;

    if media.is_empty() {
        info!("No media cached yet. Run tunefind-playlist fetch <MEDIA_NAME>.");
        return;
    }

    let table_rows: Vec<MediaTableRow> = media
        .into_iter()
        .map(|m| MediaTableRow {
            name: m.media_name,
            title: m.readable_name,
            media_type: m.media_type,
            songs: m.song_count,
            updated: utils::format_timestamp(m.last_updated),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
