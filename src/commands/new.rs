//! Create a new post

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a new post in the source directory, returning its path
///
/// The filename follows `new_post_name` (`:year`, `:month`, `:day`, `:title`).
/// An explicit `slug` is used for the filename and also written to the front
/// matter; otherwise the slug is derived from the title.
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    create_post_at(site, title, slug, Local::now())
}

fn create_post_at(
    site: &Site,
    title: &str,
    slug: Option<&str>,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Post title must not be empty");
    }

    let file_slug = ::slug::slugify(slug.unwrap_or(title));
    if file_slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}, pass --slug", title);
    }

    let filename = site
        .config
        .new_post_name
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string())
        .replace(":title", &file_slug);

    fs::create_dir_all(&site.source_dir)?;
    let file_path = site.source_dir.join(&filename);

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut content = format!(
        "---\ntitle: {}\ndate: {}\n",
        title,
        now.format("%Y-%m-%d")
    );
    if slug.is_some() {
        content.push_str(&format!("slug: {}\n", file_slug));
    }
    content.push_str("---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
