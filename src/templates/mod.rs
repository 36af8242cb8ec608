//! Built-in page template
//!
//! Wraps a rendered post fragment in the page chrome: head metadata,
//! canonical link, Open Graph and Twitter card tags, header and article.

use crate::config::SiteConfig;
use crate::content::ResolvedPost;
use crate::helpers::{html_escape, summarize};

/// Characters of body text used for the meta description
pub const DESCRIPTION_LENGTH: usize = 140;

const STYLE: &str = r#"    :root{ --bg:#0a0c12; --text:#edf2f7 }
    *{box-sizing:border-box} body{margin:0;background:var(--bg);color:var(--text);font-family:ui-sans-serif,-apple-system,system-ui,Segoe UI,Roboto,Helvetica,Arial}
    .container{max-width:980px;margin:0 auto;padding:24px}
    a{color:#8ab4f8;text-decoration:none} a:hover{text-decoration:underline}
    header{display:flex;align-items:center;justify-content:space-between;margin-bottom:14px}
    .brand{font-weight:900;letter-spacing:.5px}
    .article{background:rgba(16,20,28,.42);border:1px solid rgba(255,255,255,.08);border-radius:22px;padding:18px}
    .meta{color:#9aa0a6;margin:6px 0 12px}
    .content{line-height:1.75;color:#cfd6e4}
    .content img{max-width:100%;height:auto;border-radius:12px;display:block;margin:12px auto}"#;

/// Template data for one post page
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub site_title: &'a str,
    pub language: &'a str,
    pub title: &'a str,
    pub date: &'a str,
    pub description: String,
    pub url: &'a str,
    pub thumb: &'a str,
    pub content: &'a str,
}

impl<'a> PageContext<'a> {
    /// Build the context for a resolved post
    pub fn for_post(config: &'a SiteConfig, post: &'a ResolvedPost) -> Self {
        Self {
            site_title: &config.title,
            language: &config.language,
            title: &post.title,
            date: &post.date,
            description: summarize(&post.html, DESCRIPTION_LENGTH),
            url: &post.permalink,
            thumb: &post.thumb,
            content: &post.html,
        }
    }
}

/// Template renderer for post pages
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a full HTML document around the post fragment
    ///
    /// Every field except `content` is escaped; `content` is already HTML.
    pub fn render_page(&self, ctx: &PageContext<'_>) -> String {
        let title = html_escape(ctx.title);
        let description = html_escape(&ctx.description);
        let url = html_escape(ctx.url);
        let site_title = html_escape(ctx.site_title);

        let mut image_tags = String::new();
        if !ctx.thumb.is_empty() {
            let thumb = html_escape(ctx.thumb);
            image_tags.push_str(&format!(
                "  <meta property=\"og:image\" content=\"{}\">\n  <meta name=\"twitter:image\" content=\"{}\">\n",
                thumb, thumb
            ));
        }

        format!(
            r#"<!doctype html>
<html lang="{lang}">
<head>
  <meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | {site_title}</title>
  <meta name="description" content="{description}">
  <link rel="canonical" href="{url}">
  <meta property="og:type" content="article">
  <meta property="og:title" content="{title}">
  <meta property="og:description" content="{description}">
  <meta property="og:url" content="{url}">
{image_tags}  <meta name="twitter:card" content="summary_large_image">
  <link rel="alternate" type="application/rss+xml" href="/rss.xml" title="{site_title}">
  <style>
{style}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <div class="brand">{site_title}</div>
      <nav><a href="/">Home</a></nav>
    </header>
    <article class="article">
      <h1>{title}</h1>
      <div class="meta">{date}</div>
      <div class="content">{content}</div>
    </article>
  </div>
</body>
</html>
"#,
            lang = html_escape(ctx.language),
            title = title,
            site_title = site_title,
            description = description,
            url = url,
            image_tags = image_tags,
            style = STYLE,
            date = html_escape(ctx.date),
            content = ctx.content,
        )
    }
}
