use sqlx::SqlitePool;

use crate::error::Result;

/// Creates the image/tag/image_tag schema. Idempotent — safe to run on
/// every startup and against `sqlite::memory:` pools in tests.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS image (
            id INTEGER PRIMARY KEY,
            digest TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tag (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS image_tag (
            image_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            UNIQUE(image_id, tag_id),
            FOREIGN KEY (image_id) REFERENCES image(id),
            FOREIGN KEY (tag_id) REFERENCES tag(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_image_tag_tag_id ON image_tag(tag_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_image_tag_image_id ON image_tag(image_id)")
        .execute(pool)
        .await?;

    Ok(())
}
