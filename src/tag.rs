//! Tag attachment.
//!
//! Attaching a tag is always create-then-link: the tag row is created
//! idempotently on first use of the name, then associated with the image.
//! Repeating the whole action is harmless — the link is unique.

use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::index::Index;
use crate::models::Tag;

/// Attach `tag_name` to the image and return the image's full tag list.
/// Fails with [`Error::NotFound`] when the image id is absent and
/// [`Error::MalformedInput`] when the name is blank.
pub async fn add_tag(index: &Index, image_id: i64, tag_name: &str) -> Result<Vec<Tag>> {
    let tag_name = tag_name.trim();
    if tag_name.is_empty() {
        return Err(Error::malformed("tag name must not be empty"));
    }

    // Resolve the image first so tagging a missing id is NotFound rather
    // than a dangling link.
    let image = index.find_image_by_id(image_id).await?;
    let tag = index.create_tag(tag_name).await?;
    index.link_tag(image.id, tag.id).await?;

    index.find_tags_for_image(image.id).await
}

/// CLI entry point — attaches the tag and prints the updated tag list.
pub async fn run_tag(pool: &SqlitePool, image_id: i64, tag_name: &str) -> anyhow::Result<()> {
    let index = Index::new(pool.clone());
    let tags = add_tag(&index, image_id, tag_name).await?;

    println!(
        "tagged image {} — tags: {}",
        image_id,
        tags.iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
