//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding the configured base URL
pub const SITE_URL_ENV: &str = "SITE_URL";

/// Base URL used when neither the config file nor the environment sets one
pub const DEFAULT_URL: &str = "https://example.github.io";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Writing
    pub new_post_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "mdpress".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: DEFAULT_URL.to_string(),

            source_dir: "posts".to_string(),
            public_dir: "public".to_string(),

            new_post_name: ":year-:month-:day-:title.md".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Apply the `SITE_URL` environment override, if set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SITE_URL_ENV) {
            self.set_url(&url);
        }
    }

    /// Override the base URL; blank values are ignored
    pub fn set_url(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            tracing::debug!("Using base URL {}", url);
            self.url = url.to_string();
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
