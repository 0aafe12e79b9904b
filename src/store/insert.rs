use sqlx::SqliteConnection;

use super::CacheStore;
use crate::{
    Error, Res, debug,
    types::{MediaContent, MediaRecord, MediaType, Season, Song},
    utils,
};

impl CacheStore {
    /// Stores a fetched media record.
    ///
    /// Every row is resolved or created, so inserting the same record twice
    /// leaves the cache unchanged apart from the media's `readable_name` and
    /// `last_updated`, which always reflect the latest fetch. The whole record
    /// is written in one transaction.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRecord`] if the record's type and content disagree, or
    ///   the media is already cached under a different type
    /// - [`Error::Store`] for any database failure
    pub async fn insert_data(&self, record: &MediaRecord) -> Res<()> {
        match (&record.media_type, &record.content) {
            (MediaType::Show, MediaContent::Show { .. })
            | (MediaType::Movie | MediaType::Game, MediaContent::Songs { .. }) => {}
            (MediaType::Show, MediaContent::Songs { .. }) => {
                return Err(Error::invalid_record(
                    &record.media_name,
                    "show record without seasons",
                ));
            }
            (_, MediaContent::Show { .. }) => {
                return Err(Error::invalid_record(
                    &record.media_name,
                    format!("{} record with seasons", record.media_type),
                ));
            }
        }

        let mut tx = self.pool.begin().await?;

        let media_id = upsert_media(&mut *tx, record).await?;

        match &record.content {
            MediaContent::Show { seasons } => {
                for (season_idx, season) in seasons.iter().enumerate() {
                    insert_season(&mut *tx, media_id, season_idx as i64 + 1, season).await?;
                }
            }
            MediaContent::Songs { songs } => {
                for song in songs {
                    let song_id = get_or_create_song(&mut *tx, song).await?;
                    sqlx::query(
                        "INSERT INTO media_songs (media_id, song_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
                    )
                    .bind(media_id)
                    .bind(song_id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;

        debug!(
            "Stored '{}' ({} songs) with id {}",
            record.media_name,
            record.song_count(),
            media_id
        );
        Ok(())
    }
}

/// Inserts the media row or refreshes its display name and timestamp.
/// The type of an existing row is never changed.
async fn upsert_media(conn: &mut SqliteConnection, record: &MediaRecord) -> Res<i64> {
    let (id, stored_type): (i64, String) = sqlx::query_as(
        r#"
        INSERT INTO media (media_name, media_type, readable_name, last_updated)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(media_name) DO UPDATE SET
            readable_name = excluded.readable_name,
            last_updated = excluded.last_updated
        RETURNING id, media_type
        "#,
    )
    .bind(&record.media_name)
    .bind(record.media_type.translate())
    .bind(&record.readable_name)
    .bind(utils::now_timestamp())
    .fetch_one(&mut *conn)
    .await?;

    if stored_type != record.media_type.translate() {
        return Err(Error::invalid_record(
            &record.media_name,
            format!(
                "already cached as {} but fetched as {}",
                stored_type, record.media_type
            ),
        ));
    }

    Ok(id)
}

async fn insert_season(
    conn: &mut SqliteConnection,
    media_id: i64,
    season_number: i64,
    season: &Season,
) -> Res<()> {
    for (episode_idx, episode) in season.episodes.iter().enumerate() {
        let episode_number = episode_idx as i64 + 1;

        sqlx::query(
            r#"
            INSERT INTO episodes (season_number, episode_number, external_episode_id, media_id)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(media_id, season_number, episode_number) DO NOTHING
            "#,
        )
        .bind(season_number)
        .bind(episode_number)
        .bind(&episode.id)
        .bind(media_id)
        .execute(&mut *conn)
        .await?;

        let (episode_id,): (i64,) = sqlx::query_as(
            "SELECT id FROM episodes WHERE media_id = ? AND season_number = ? AND episode_number = ?",
        )
        .bind(media_id)
        .bind(season_number)
        .bind(episode_number)
        .fetch_one(&mut *conn)
        .await?;

        for song in &episode.songs {
            let song_id = get_or_create_song(conn, song).await?;
            sqlx::query(
                "INSERT INTO episode_songs (episode_id, song_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
            )
            .bind(episode_id)
            .bind(song_id)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(())
}

/// Returns the id of the song with the same catalog id, inserting it first
/// if it is not cached yet.
async fn get_or_create_song(conn: &mut SqliteConnection, song: &Song) -> Res<i64> {
    sqlx::query(
        r#"
        INSERT INTO songs (song_name, artists, external_song_id, track_uri)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(external_song_id) DO NOTHING
        "#,
    )
    .bind(&song.name)
    .bind(&song.artists)
    .bind(&song.id)
    .bind(&song.spotify)
    .execute(&mut *conn)
    .await?;

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM songs WHERE external_song_id = ?")
        .bind(&song.id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(id)
}
