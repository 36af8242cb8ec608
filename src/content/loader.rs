//! Content loader - enumerates and reads posts from the source directory

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, PostResolver, ResolvedPost};
use crate::Site;

/// File extensions recognized as Markdown sources
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A source file as read from disk
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name, e.g. `2024-03-01-my-post.md`
    pub filename: String,
    /// Full path on disk
    pub path: PathBuf,
    /// Raw file contents
    pub raw: String,
}

/// Publish order: reverse lexicographic on filename, so date-prefixed
/// filenames come out newest first
pub fn publish_order(a: &str, b: &str) -> Ordering {
    b.cmp(a)
}

/// Loads posts from the source directory
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Markdown files directly inside the source directory, in publish order
    ///
    /// A missing or unreadable directory yields no files.
    pub fn list_sources(&self) -> Vec<PathBuf> {
        let dir = &self.site.source_dir;
        if !dir.is_dir() {
            tracing::warn!("Source directory {:?} not found, building an empty site", dir);
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_markdown_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort_by(|a, b| publish_order(&file_name(a), &file_name(b)));
        files
    }

    /// Read every source document, in publish order
    pub fn load_sources(&self) -> Result<Vec<SourceDocument>> {
        self.list_sources()
            .into_iter()
            .map(|path| {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                Ok(SourceDocument {
                    filename: file_name(&path),
                    path,
                    raw,
                })
            })
            .collect()
    }

    /// Read and resolve every post, in publish order
    pub fn load_posts(&self, resolver: &PostResolver) -> Result<Vec<ResolvedPost>> {
        let posts = self
            .load_sources()?
            .iter()
            .map(|doc| {
                let post = resolver.resolve(&FrontMatter::parse(&doc.raw), &doc.filename);
                tracing::debug!("Resolved {} -> {}", doc.filename, post.slug);
                post
            })
            .collect();
        Ok(posts)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MARKDOWN_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
