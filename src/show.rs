//! Image detail retrieval.
//!
//! Fetches one image row, its tags, and the archived bytes. Used by the
//! `sbx show` CLI command and the `show_img` HTTP message.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::index::Index;
use crate::models::ImageDetail;
use crate::store::ContentStore;

/// Core show function returning structured data (used by CLI and server).
/// Absent ids fail with [`crate::error::Error::NotFound`].
pub async fn show_image(index: &Index, store: &ContentStore, id: i64) -> Result<ImageDetail> {
    let image = index.find_image_by_id(id).await?;
    let tags = index.find_tags_for_image(image.id).await?;

    let bytes = store.read_for(&image.digest, &image.name)?;

    Ok(ImageDetail {
        id: image.id,
        name: image.name,
        digest: image.digest,
        tags: tags.into_iter().map(|t| t.name).collect(),
        content: STANDARD.encode(bytes),
    })
}

/// CLI entry point — fetches the detail and prints it.
pub async fn run_show(pool: &SqlitePool, store: &ContentStore, id: i64) -> anyhow::Result<()> {
    let index = Index::new(pool.clone());
    let detail = show_image(&index, store, id).await?;

    println!("--- Image {} ---", detail.id);
    println!("name:    {}", detail.name);
    println!("digest:  {}", detail.digest);
    println!(
        "archive: {}",
        store.path_for(&detail.digest, &detail.name).display()
    );
    if detail.tags.is_empty() {
        println!("tags:    (none)");
    } else {
        println!("tags:    {}", detail.tags.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::hash;
    use crate::migrate;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::fs;
    use tempfile::TempDir;

    async fn test_index() -> Index {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate::run_migrations(&pool).await.unwrap();
        Index::new(pool)
    }

    #[tokio::test]
    async fn test_show_round_trips_archived_bytes() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());
        let index = test_index().await;

        let source = src.path().join("dragon.jpg");
        fs::write(&source, b"dragon bytes").unwrap();
        let file_hash = hash::hash_file(&source).unwrap();
        store.archive(&file_hash).unwrap();

        let id = index
            .create_image(&file_hash.digest_hex(), "dragon.jpg")
            .await
            .unwrap();
        let tag = index.create_tag("dragon").await.unwrap();
        index.link_tag(id, tag.id).await.unwrap();

        let detail = show_image(&index, &store, id).await.unwrap();
        assert_eq!(detail.name, "dragon.jpg");
        assert_eq!(detail.tags, vec!["dragon".to_string()]);
        assert_eq!(STANDARD.decode(&detail.content).unwrap(), b"dragon bytes");
    }

    #[tokio::test]
    async fn test_show_absent_id_is_not_found() {
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());
        let index = test_index().await;

        let err = show_image(&index, &store, 999).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_show_missing_archive_file_is_io_error() {
        let out = TempDir::new().unwrap();
        let store = ContentStore::new(out.path());
        let index = test_index().await;

        // Row exists but nothing was archived at the canonical path.
        let id = index.create_image("aa11", "gone.jpg").await.unwrap();
        let err = show_image(&index, &store, id).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
