//! Query-side commands: tag search and the full image listing.
//!
//! Queries flow the reverse direction of ingestion: index read first, then
//! (for transport payloads) the archived bytes. A search query is split on
//! whitespace into tag names and matched with OR semantics across the set —
//! images linked to any of the named tags are returned.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::index::Index;
use crate::models::Image;

/// Images linked to any tag named in `query`. Names with no matching tag
/// are silently ignored; an empty or all-miss query yields no results.
pub async fn search_images(index: &Index, query: &str) -> Result<Vec<Image>> {
    let names: Vec<String> = query.split_whitespace().map(str::to_string).collect();
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let tags = index.find_tags_by_names(&names).await?;
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    index.find_images_by_tags(&tags).await
}

pub async fn run_search(pool: &SqlitePool, query: &str) -> anyhow::Result<()> {
    let index = Index::new(pool.clone());
    let images = search_images(&index, query).await?;

    if images.is_empty() {
        println!("No results.");
        return Ok(());
    }

    print_image_rows(&images);
    Ok(())
}

pub async fn run_images(pool: &SqlitePool) -> anyhow::Result<()> {
    let index = Index::new(pool.clone());
    let images = index.find_all_images().await?;

    if images.is_empty() {
        println!("No images archived yet.");
        return Ok(());
    }

    print_image_rows(&images);
    Ok(())
}

fn print_image_rows(images: &[Image]) {
    println!("{:<6} {:<64} NAME", "ID", "DIGEST");
    for image in images {
        println!("{:<6} {:<64} {}", image.id, image.digest, image.name);
    }
}
