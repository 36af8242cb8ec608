//! Generator module - resolves posts and writes every site artifact
//!
//! A build writes one page per post under `p/<slug>/index.html`, then the
//! aggregate artifacts `posts.json`, `sitemap.xml` and `rss.xml`, all from
//! the same ordered list of resolved posts.

mod feed;
mod sitemap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::content::loader::ContentLoader;
use crate::content::{PostResolver, ResolvedPost};
use crate::helpers::POST_DIR;
use crate::templates::{PageContext, TemplateRenderer};
use crate::Site;

/// JSON index of all posts
pub const INDEX_FILE: &str = "posts.json";
/// Sitemap file
pub const SITEMAP_FILE: &str = "sitemap.xml";
/// RSS feed file
pub const FEED_FILE: &str = "rss.xml";

/// Fatal build errors
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Slug {slug:?} is produced by both {first:?} and {second:?}")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove stale output {path:?}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Load(#[from] anyhow::Error),

    #[error("Failed to serialize post index: {0}")]
    Index(#[from] serde_json::Error),
}

/// Outcome of a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildResult {
    pub post_count: usize,
}

/// Static site generator
pub struct Generator {
    site: Site,
    build_time: DateTime<Utc>,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator using the current time as the build clock
    pub fn new(site: &Site) -> Self {
        Self::with_build_time(site, Utc::now())
    }

    /// Create a generator with a fixed build clock
    pub fn with_build_time(site: &Site, build_time: DateTime<Utc>) -> Self {
        Self {
            site: site.clone(),
            build_time,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Resolve every post in publish order
    pub fn load_posts(&self) -> Result<Vec<ResolvedPost>, GenerateError> {
        let resolver = PostResolver::new(self.site.config.base_url(), self.build_time);
        let posts = ContentLoader::new(&self.site).load_posts(&resolver)?;
        check_slug_collisions(&posts)?;
        Ok(posts)
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<BuildResult, GenerateError> {
        let posts = self.load_posts()?;
        tracing::info!("Loaded {} posts", posts.len());

        self.remove_stale_pages()?;
        for post in &posts {
            self.generate_post_page(post)?;
        }

        // Aggregates need the complete list
        self.generate_index(&posts)?;
        self.generate_sitemap(&posts)?;
        self.generate_feed(&posts)?;

        Ok(BuildResult {
            post_count: posts.len(),
        })
    }

    /// Remove the post tree left by a previous build
    fn remove_stale_pages(&self) -> Result<(), GenerateError> {
        let post_root = self.site.public_dir.join(POST_DIR);
        if post_root.exists() {
            fs::remove_dir_all(&post_root).map_err(|source| GenerateError::Cleanup {
                path: post_root.clone(),
                source,
            })?;
            tracing::debug!("Removed stale pages under {:?}", post_root);
        }
        Ok(())
    }

    /// Write `p/<slug>/index.html`
    fn generate_post_page(&self, post: &ResolvedPost) -> Result<(), GenerateError> {
        let html = self
            .renderer
            .render_page(&PageContext::for_post(&self.site.config, post));
        let output_path = self.site.public_dir.join(post.path()).join("index.html");
        write_file(&output_path, &html)?;
        tracing::debug!("Generated post: {:?}", output_path);
        Ok(())
    }

    /// Write `posts.json`
    fn generate_index(&self, posts: &[ResolvedPost]) -> Result<(), GenerateError> {
        let json = serde_json::to_string_pretty(posts)?;
        write_file(&self.site.public_dir.join(INDEX_FILE), &json)?;
        tracing::info!("Generated {}", INDEX_FILE);
        Ok(())
    }

    /// Write `sitemap.xml`
    fn generate_sitemap(&self, posts: &[ResolvedPost]) -> Result<(), GenerateError> {
        let xml = sitemap::render(self.site.config.base_url(), posts);
        write_file(&self.site.public_dir.join(SITEMAP_FILE), &xml)?;
        tracing::info!("Generated {}", SITEMAP_FILE);
        Ok(())
    }

    /// Write `rss.xml`
    fn generate_feed(&self, posts: &[ResolvedPost]) -> Result<(), GenerateError> {
        let xml = feed::render(&self.site.config, posts, self.build_time);
        write_file(&self.site.public_dir.join(FEED_FILE), &xml)?;
        tracing::info!("Generated {}", FEED_FILE);
        Ok(())
    }
}

/// Fail when two posts resolve to the same slug
fn check_slug_collisions(posts: &[ResolvedPost]) -> Result<(), GenerateError> {
    let mut seen: IndexMap<&str, &str> = IndexMap::with_capacity(posts.len());
    for post in posts {
        if let Some(first) = seen.insert(&post.slug, &post.source) {
            return Err(GenerateError::SlugCollision {
                slug: post.slug.clone(),
                first: first.to_string(),
                second: post.source.clone(),
            });
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let to_error = |source: io::Error| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, contents).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn build_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn site_with_posts(files: &[(&str, &str)]) -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("_config.yml"),
            "title: Focus Log\nurl: https://focus.example.com/\n",
        )
        .unwrap();
        let posts = tmp.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        for (name, content) in files {
            fs::write(posts.join(name), content).unwrap();
        }
        let mut site = Site::new(tmp.path()).unwrap();
        // SITE_URL from the test environment must not leak into the assertions
        site.config.url = "https://focus.example.com/".to_string();
        (tmp, site)
    }

    fn read(site: &Site, rel: &str) -> String {
        fs::read_to_string(site.public_dir.join(rel)).unwrap()
    }

    #[test]
    fn test_two_posts_end_to_end() {
        let (_tmp, site) = site_with_posts(&[
            ("2024-01-01-a.md", "# Post A\n\nFirst post."),
            ("2024-02-01-b.md", "---\ntitle: Post B\n---\nSecond post with ![pic](/b.png)."),
        ]);

        let result = Generator::with_build_time(&site, build_time()).generate().unwrap();
        assert_eq!(result.post_count, 2);

        // Pages
        let page_b = read(&site, "p/b/index.html");
        assert!(page_b.contains("<title>Post B | Focus Log</title>"));
        assert!(page_b.contains(r#"<meta property="og:image" content="/b.png">"#));
        let page_a = read(&site, "p/a/index.html");
        assert!(page_a.contains("<p>First post.</p>"));

        // Index in reverse filename order
        let index: serde_json::Value = serde_json::from_str(&read(&site, INDEX_FILE)).unwrap();
        let entries = index.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["slug"], "b");
        assert_eq!(entries[1]["slug"], "a");
        assert_eq!(entries[1]["md"], "# Post A\n\nFirst post.");
        assert!(entries[0].get("html").is_none());

        // Sitemap: root + one per post
        let sitemap = read(&site, SITEMAP_FILE);
        assert_eq!(sitemap.matches("<url>").count(), 3);
        assert!(sitemap.contains("<loc>https://focus.example.com/</loc><priority>1.0</priority>"));

        // Feed links match the page paths
        let feed = read(&site, FEED_FILE);
        assert_eq!(feed.matches("<item>").count(), 2);
        for slug in ["a", "b"] {
            let url = format!("https://focus.example.com/p/{}/", slug);
            assert!(feed.contains(&format!("<link>{}</link>", url)));
            assert!(sitemap.contains(&format!("<loc>{}</loc>", url)));
            assert!(site.public_dir.join(format!("p/{}/index.html", slug)).is_file());
        }
        assert!(feed.find("/p/b/").unwrap() < feed.find("/p/a/").unwrap());
    }

    #[test]
    fn test_missing_source_dir_builds_empty_site() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let result = Generator::with_build_time(&site, build_time()).generate().unwrap();
        assert_eq!(result.post_count, 0);

        let index: serde_json::Value = serde_json::from_str(&read(&site, INDEX_FILE)).unwrap();
        assert_eq!(index, serde_json::json!([]));
        assert_eq!(read(&site, SITEMAP_FILE).matches("<url>").count(), 1);
        let feed = read(&site, FEED_FILE);
        assert!(feed.contains("<channel>"));
        assert_eq!(feed.matches("<item>").count(), 0);
        assert!(!site.public_dir.join(POST_DIR).exists());
    }

    #[test]
    fn test_slug_collision_is_rejected() {
        let (_tmp, site) = site_with_posts(&[
            ("2024-01-01-same.md", "one"),
            ("2024-02-01-other.md", "---\nslug: same\n---\ntwo"),
        ]);

        let err = Generator::with_build_time(&site, build_time())
            .generate()
            .unwrap_err();
        match err {
            GenerateError::SlugCollision { slug, first, second } => {
                assert_eq!(slug, "same");
                assert_eq!(first, "2024-02-01-other.md");
                assert_eq!(second, "2024-01-01-same.md");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!site.public_dir.join(INDEX_FILE).exists());
    }

    #[test]
    fn test_stale_pages_are_removed() {
        let (_tmp, site) = site_with_posts(&[("2024-01-01-keep.md", "keep")]);
        let stale = site.public_dir.join("p/removed/index.html");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        let unrelated = site.public_dir.join("CNAME");
        fs::write(&unrelated, "focus.example.com").unwrap();

        Generator::with_build_time(&site, build_time()).generate().unwrap();

        assert!(!stale.exists());
        assert!(unrelated.exists());
        assert!(site.public_dir.join("p/keep/index.html").exists());
    }

    #[test]
    fn test_build_is_deterministic_for_fixed_clock() {
        let (_tmp, site) = site_with_posts(&[("undated.md", "no date anywhere")]);
        let generator = Generator::with_build_time(&site, build_time());

        generator.generate().unwrap();
        let first = read(&site, FEED_FILE);
        generator.generate().unwrap();
        assert_eq!(first, read(&site, FEED_FILE));

        let index: serde_json::Value = serde_json::from_str(&read(&site, INDEX_FILE)).unwrap();
        assert_eq!(index[0]["date"], "2025-06-30");
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let (_tmp, site) = site_with_posts(&[("2024-01-01-a.md", "a")]);
        // A file where the output directory should be
        fs::write(&site.public_dir, "not a directory").unwrap();

        let err = Generator::with_build_time(&site, build_time())
            .generate()
            .unwrap_err();
        assert!(matches!(err, GenerateError::Write { .. }));
    }
}
