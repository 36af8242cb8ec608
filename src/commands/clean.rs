//! Remove generated artifacts

use anyhow::{Context, Result};
use std::fs;

use crate::generator::{FEED_FILE, INDEX_FILE, SITEMAP_FILE};
use crate::helpers::POST_DIR;
use crate::Site;

/// Delete the post tree and the aggregate files from the public directory
///
/// Anything else in the public directory is left alone, since it may be
/// shared with hand-written files.
pub fn run(site: &Site) -> Result<()> {
    let post_root = site.public_dir.join(POST_DIR);
    if post_root.exists() {
        fs::remove_dir_all(&post_root)
            .with_context(|| format!("Failed to delete {:?}", post_root))?;
        tracing::info!("Deleted: {:?}", post_root);
    }

    for name in [INDEX_FILE, SITEMAP_FILE, FEED_FILE] {
        let path = site.public_dir.join(name);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to delete {:?}", path))?;
            tracing::info!("Deleted: {:?}", path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_only_generated_files() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        let page = site.public_dir.join("p/a/index.html");
        fs::create_dir_all(page.parent().unwrap()).unwrap();
        fs::write(&page, "page").unwrap();
        for name in [INDEX_FILE, SITEMAP_FILE, FEED_FILE, "index.html"] {
            fs::write(site.public_dir.join(name), "x").unwrap();
        }

        run(&site).unwrap();

        assert!(!site.public_dir.join(POST_DIR).exists());
        assert!(!site.public_dir.join(INDEX_FILE).exists());
        assert!(!site.public_dir.join(SITEMAP_FILE).exists());
        assert!(!site.public_dir.join(FEED_FILE).exists());
        assert!(site.public_dir.join("index.html").exists());
    }

    #[test]
    fn test_clean_without_output_is_noop() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        run(&site).unwrap();
    }
}
