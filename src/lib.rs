//! mdpress: a small static site generator for a folder of Markdown posts
//!
//! Each build turns `<source_dir>/*.md` into one HTML page per post plus a
//! JSON index, a sitemap and an RSS feed under `<public_dir>`.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the optional site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The site being built
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory holding the Markdown posts
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a site from a base directory
    ///
    /// Reads `_config.yml` when present, then applies the `SITE_URL`
    /// environment override. Nothing downstream reads the environment.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    /// Build the static site
    pub fn build(&self) -> Result<generator::BuildResult> {
        commands::build::run(self)
    }

    /// Remove generated artifacts
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_site_defaults() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.source_dir, tmp.path().join("posts"));
        assert_eq!(site.public_dir, tmp.path().join("public"));
    }

    #[test]
    fn test_site_reads_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "source_dir: content\npublic_dir: docs\n",
        )
        .unwrap();
        let site = Site::new(tmp.path()).unwrap();
        assert_eq!(site.source_dir, tmp.path().join("content"));
        assert_eq!(site.public_dir, tmp.path().join("docs"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "title: [unclosed\n").unwrap();
        assert!(Site::new(tmp.path()).is_err());
    }
}
