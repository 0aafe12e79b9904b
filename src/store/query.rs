use super::CacheStore;
use crate::{
    Error, Res, config,
    types::{MediaSummary, MediaType},
    utils,
};

impl CacheStore {
    /// Returns whether `media_name` is cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Inconsistent`] if more than one row carries the name.
    pub async fn media_exists(&self, media_name: &str) -> Res<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media WHERE media_name = ?")
            .bind(media_name)
            .fetch_one(&self.pool)
            .await?;

        match count {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(Error::Inconsistent(format!(
                "{} media rows named '{}'",
                n, media_name
            ))),
        }
    }

    /// Stored media type of `media_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMedia`] if the name is not cached and
    /// [`Error::Inconsistent`] if the stored type is not recognized.
    pub async fn get_media_type(&self, media_name: &str) -> Res<MediaType> {
        let (value,): (String,) = sqlx::query_as("SELECT media_type FROM media WHERE media_name = ?")
            .bind(media_name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::UnknownMedia(media_name.to_string()))?;

        MediaType::read_in(&value).ok_or_else(|| {
            Error::Inconsistent(format!(
                "unknown media type '{}' stored for '{}'",
                value, media_name
            ))
        })
    }

    /// Unix timestamp of the latest fetch.
    pub async fn get_last_updated(&self, media_name: &str) -> Res<i64> {
        let (value,): (i64,) = sqlx::query_as("SELECT last_updated FROM media WHERE media_name = ?")
            .bind(media_name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::UnknownMedia(media_name.to_string()))?;
        Ok(value)
    }

    /// Display name of `media_name`, as listed on Tunefind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMedia`] if the name is not cached.
    pub async fn get_readable_name(&self, media_name: &str) -> Res<String> {
        let (value,): (String,) =
            sqlx::query_as("SELECT readable_name FROM media WHERE media_name = ?")
                .bind(media_name)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::UnknownMedia(media_name.to_string()))?;
        Ok(value)
    }

    /// Builds the playlist description: the media's Tunefind page and the
    /// time of the latest fetch.
    pub async fn get_playlist_description(&self, media_name: &str) -> Res<String> {
        let (readable_name, media_type, last_updated): (String, String, i64) = sqlx::query_as(
            "SELECT readable_name, media_type, last_updated FROM media WHERE media_name = ?",
        )
        .bind(media_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::UnknownMedia(media_name.to_string()))?;

        Ok(format!(
            "Songs from {} as listed on {}/{}/{}. Last updated {}.",
            readable_name,
            config::tunefind_base_url().trim_end_matches('/'),
            media_type,
            media_name,
            utils::format_timestamp(last_updated)
        ))
    }

    /// Track URIs of a movie or game, in the order they were listed.
    /// Songs without a resolved URI are skipped.
    pub async fn get_track_uris_for_media(&self, media_name: &str) -> Res<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT s.track_uri
            FROM songs s
            JOIN media_songs ms ON ms.song_id = s.id
            JOIN media m ON m.id = ms.media_id
            WHERE m.media_name = ? AND s.track_uri <> ''
            ORDER BY ms.id
            "#,
        )
        .bind(media_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(uri,)| uri).collect())
    }

    /// Track URIs of a show ordered by season and episode, optionally limited
    /// to one season. Songs without a resolved URI are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SeasonOutOfRange`] if `season` matches no episode of
    /// the show. A season whose songs are all unresolved yields an empty list.
    pub async fn get_track_uris_for_show(
        &self,
        media_name: &str,
        season: Option<u32>,
    ) -> Res<Vec<String>> {
        let rows: Vec<(String,)> = match season {
            Some(season) => {
                let (episodes,): (i64,) = sqlx::query_as(
                    r#"
                    SELECT COUNT(*)
                    FROM episodes e
                    JOIN media m ON m.id = e.media_id
                    WHERE m.media_name = ? AND e.season_number = ?
                    "#,
                )
                .bind(media_name)
                .bind(season as i64)
                .fetch_one(&self.pool)
                .await?;

                if episodes == 0 {
                    return Err(Error::SeasonOutOfRange {
                        media: media_name.to_string(),
                        season,
                        available: self.get_season_count(media_name).await?,
                    });
                }

                sqlx::query_as(
                    r#"
                    SELECT s.track_uri
                    FROM songs s
                    JOIN episode_songs es ON es.song_id = s.id
                    JOIN episodes e ON e.id = es.episode_id
                    JOIN media m ON m.id = e.media_id
                    WHERE m.media_name = ? AND e.season_number = ? AND s.track_uri <> ''
                    ORDER BY e.season_number, e.episode_number, es.id
                    "#,
                )
                .bind(media_name)
                .bind(season as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT s.track_uri
                    FROM songs s
                    JOIN episode_songs es ON es.song_id = s.id
                    JOIN episodes e ON e.id = es.episode_id
                    JOIN media m ON m.id = e.media_id
                    WHERE m.media_name = ? AND s.track_uri <> ''
                    ORDER BY e.season_number, e.episode_number, es.id
                    "#,
                )
                .bind(media_name)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|(uri,)| uri).collect())
    }

    /// Number of seasons cached for a show, `0` for other media.
    pub async fn get_season_count(&self, media_name: &str) -> Res<u32> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(MAX(e.season_number), 0)
            FROM episodes e
            JOIN media m ON m.id = e.media_id
            WHERE m.media_name = ?
            "#,
        )
        .bind(media_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u32)
    }

    /// All cached media sorted by name, with the number of distinct songs.
    pub async fn list_media(&self) -> Res<Vec<MediaSummary>> {
        let rows = sqlx::query_as::<_, MediaSummary>(
            r#"
            SELECT
                m.media_name,
                m.readable_name,
                m.media_type,
                m.last_updated,
                (SELECT COUNT(*) FROM media_songs ms WHERE ms.media_id = m.id)
                + (
                    SELECT COUNT(DISTINCT es.song_id)
                    FROM episode_songs es
                    JOIN episodes e ON e.id = es.episode_id
                    WHERE e.media_id = m.id
                ) AS song_count
            FROM media m
            ORDER BY m.media_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
