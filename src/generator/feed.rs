//! RSS 2.0 feed rendering

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::ResolvedPost;
use crate::helpers::{escape_xml, format_rfc822, full_url_for, strip_invalid_xml_chars};

/// Render `rss.xml` with one item per post
///
/// `pubDate` comes from the post date; dates that do not parse fall back to
/// `build_time`.
pub fn render(config: &SiteConfig, posts: &[ResolvedPost], build_time: DateTime<Utc>) -> String {
    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0">"#);
    feed.push('\n');
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", xml_text(&config.title)));
    feed.push_str(&format!(
        "    <link>{}</link>\n",
        escape_xml(&full_url_for(config.base_url(), ""))
    ));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        xml_text(&config.description)
    ));
    feed.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        format_rfc822(&build_time)
    ));

    for post in posts {
        let published = post.published_at().unwrap_or_else(|| {
            tracing::debug!("Unparseable date {:?} for {}, using build time", post.date, post.slug);
            build_time
        });
        let link = escape_xml(&post.permalink);

        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", xml_text(&post.title)));
        feed.push_str(&format!("      <link>{}</link>\n", link));
        feed.push_str(&format!("      <guid isPermaLink=\"true\">{}</guid>\n", link));
        feed.push_str(&format!(
            "      <pubDate>{}</pubDate>\n",
            format_rfc822(&published)
        ));
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}

fn xml_text(s: &str) -> String {
    escape_xml(&strip_invalid_xml_chars(s))
}
