//! Relational tag/image index over SQLite.
//!
//! Three entities: `image` (unique content digest), `tag` (unique name),
//! and the `image_tag` many-to-many link. Each write is a single SQL
//! statement, so concurrent ingestion and tagging requests never observe a
//! partial insert. Query shape is the interesting part: tag membership is
//! a set — `find_images_by_tags` is OR across the input tags.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{Image, Tag};

/// Index operations bound to a connection pool. Constructed explicitly and
/// passed where needed — there is no ambient global connection.
#[derive(Debug, Clone)]
pub struct Index {
    pool: SqlitePool,
}

impl Index {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new image row and return its id. A duplicate digest is a
    /// [`Error::ConstraintViolation`] — callers treat it as "already
    /// archived, not a new image".
    pub async fn create_image(&self, digest: &str, name: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO image (digest, name) VALUES (?, ?)")
            .bind(digest)
            .bind(name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::ConstraintViolation {
                    digest: digest.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotent tag creation: returns the existing row when the name is
    /// already taken. Callers routinely run this before every tagging
    /// action.
    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        sqlx::query("INSERT INTO tag (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT id, name FROM tag WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(tag_from_row(&row))
    }

    /// Associate an image with a tag. Linking the same pair twice is a
    /// no-op — `image_tag` enforces `UNIQUE(image_id, tag_id)`.
    pub async fn link_tag(&self, image_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO image_tag (image_id, tag_id) VALUES (?, ?) \
             ON CONFLICT(image_id, tag_id) DO NOTHING",
        )
        .bind(image_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Exact-match lookup; names with no matching tag are silently omitted.
    pub async fn find_tags_by_names(&self, names: &[String]) -> Result<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "SELECT id, name FROM tag WHERE name IN ({}) ORDER BY id",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for name in names {
            query = query.bind(name);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(tag_from_row).collect())
    }

    /// Every image linked to at least one tag in the set (OR across tags).
    /// `DISTINCT` keeps an image matched by several tags to one row.
    pub async fn find_images_by_tags(&self, tags: &[Tag]) -> Result<Vec<Image>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let sql = format!(
            "SELECT DISTINCT image.id, image.digest, image.name FROM image \
             INNER JOIN image_tag ON image.id = image_tag.image_id \
             WHERE image_tag.tag_id IN ({}) ORDER BY image.id",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for tag in tags {
            query = query.bind(tag.id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(image_from_row).collect())
    }

    pub async fn find_all_images(&self) -> Result<Vec<Image>> {
        let rows = sqlx::query("SELECT id, digest, name FROM image ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(image_from_row).collect())
    }

    pub async fn find_image_by_id(&self, id: i64) -> Result<Image> {
        let row = sqlx::query("SELECT id, digest, name FROM image WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(image_from_row(&row)),
            None => Err(Error::not_found("image", id)),
        }
    }

    pub async fn find_tags_for_image(&self, image_id: i64) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT tag.id, tag.name FROM tag \
             INNER JOIN image_tag ON tag.id = image_tag.tag_id \
             WHERE image_tag.image_id = ? ORDER BY tag.id",
        )
        .bind(image_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tag_from_row).collect())
    }
}

fn image_from_row(row: &SqliteRow) -> Image {
    Image {
        id: row.get("id"),
        digest: row.get("digest"),
        name: row.get("name"),
    }
}

fn tag_from_row(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
    }
}
