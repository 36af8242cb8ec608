//! Resolved post model and the fallback rules that produce it

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use super::frontmatter::ParsedDocument;
use super::markdown::MarkdownRenderer;
use super::slug;
use crate::helpers::{
    date_prefix, format_ymd, full_url_for, parse_calendar_date, parse_date_string, post_path,
};

lazy_static! {
    static ref FIRST_H1: Regex = Regex::new(r"(?m)^#\s+(.+)$").unwrap();
    static ref FIRST_IMAGE: Regex = Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").unwrap();
}

/// Slug used when neither the front matter nor the filename yields one
pub const FALLBACK_SLUG: &str = "untitled";

/// A fully resolved post, ready for artifact emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPost {
    /// URL-safe identifier, never empty
    pub slug: String,

    /// Post title, never empty
    pub title: String,

    /// Publication date, `YYYY-MM-DD` whenever it could be parsed
    pub date: String,

    /// Thumbnail URL, or empty
    pub thumb: String,

    /// Rendered HTML fragment of the body
    #[serde(skip)]
    pub html: String,

    /// Original Markdown body
    #[serde(rename = "md")]
    pub raw_body: String,

    /// Source filename the post was resolved from
    #[serde(skip)]
    pub source: String,

    /// Absolute URL of the post page
    #[serde(skip)]
    pub permalink: String,
}

impl ResolvedPost {
    /// Site-relative path of the post page (`p/<slug>/`)
    pub fn path(&self) -> String {
        post_path(&self.slug)
    }

    /// Publication time for feeds; `None` when the date does not parse
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_date_string(&self.date)
    }
}

/// Merges front matter, filename conventions and rendered body into a post
pub struct PostResolver {
    base_url: String,
    build_time: DateTime<Utc>,
    renderer: MarkdownRenderer,
}

impl PostResolver {
    /// Create a resolver for one build run
    ///
    /// `build_time` is the clock every fallback date is taken from, so a run
    /// resolves identically however long it takes.
    pub fn new(base_url: &str, build_time: DateTime<Utc>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            build_time,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Resolve a parsed document read from `filename`
    pub fn resolve(&self, parsed: &ParsedDocument<'_>, filename: &str) -> ResolvedPost {
        let fm = &parsed.front_matter;
        let body = parsed.body;
        let stem = file_stem(filename);

        let slug = first_non_empty([slug::normalize(&fm.slug), slug::normalize(stem)])
            .unwrap_or_else(|| {
                tracing::warn!("No usable slug for {}, using {:?}", filename, FALLBACK_SLUG);
                FALLBACK_SLUG.to_string()
            });

        let date = self.resolve_date(&fm.date, stem, filename);

        let title = first_non_empty([fm.title.trim().to_string(), first_heading(body)])
            .unwrap_or_else(|| slug.clone());

        let thumb = first_non_empty([fm.thumb.trim().to_string(), first_image(body)])
            .unwrap_or_default();

        let permalink = full_url_for(&self.base_url, &post_path(&slug));

        ResolvedPost {
            slug,
            title,
            date,
            thumb,
            html: self.renderer.render(body),
            raw_body: body.to_string(),
            source: filename.to_string(),
            permalink,
        }
    }

    fn resolve_date(&self, front_matter_date: &str, stem: &str, filename: &str) -> String {
        let declared = front_matter_date.trim();
        if !declared.is_empty() {
            return match parse_calendar_date(declared) {
                Some(day) => day.format("%Y-%m-%d").to_string(),
                None => {
                    tracing::warn!("Unrecognized date {:?} in {}, keeping as is", declared, filename);
                    declared.to_string()
                }
            };
        }

        date_prefix(stem)
            .map(str::to_string)
            .unwrap_or_else(|| format_ymd(&self.build_time))
    }
}

/// Filename without its extension
fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Text of the first level-1 heading line in a Markdown body
pub fn first_heading(markdown: &str) -> String {
    FIRST_H1
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// URL of the first image reference in a Markdown body
pub fn first_image(markdown: &str) -> String {
    FIRST_IMAGE
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn first_non_empty<const N: usize>(candidates: [String; N]) -> Option<String> {
    candidates.into_iter().find(|c| !c.is_empty())
}
