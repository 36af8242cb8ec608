//! Sitemap rendering

use crate::content::ResolvedPost;
use crate::helpers::{escape_xml, full_url_for};

const ROOT_PRIORITY: &str = "1.0";
const POST_PRIORITY: &str = "0.7";

/// Render `sitemap.xml`: the site root followed by every post
pub fn render(base_url: &str, posts: &[ResolvedPost]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    push_url(&mut xml, &full_url_for(base_url, ""), ROOT_PRIORITY);
    for post in posts {
        push_url(&mut xml, &post.permalink, POST_PRIORITY);
    }
    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, priority: &str) {
    xml.push_str(&format!(
        "  <url><loc>{}</loc><priority>{}</priority></url>\n",
        escape_xml(loc),
        priority
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str) -> ResolvedPost {
        ResolvedPost {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: "2024-01-01".to_string(),
            thumb: String::new(),
            html: String::new(),
            raw_body: String::new(),
            source: format!("{}.md", slug),
            permalink: format!("https://ex.com/p/{}/", slug),
        }
    }

    #[test]
    fn test_root_only() {
        let xml = render("https://ex.com", &[]);
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<loc>https://ex.com/</loc><priority>1.0</priority>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_posts_follow_root() {
        let xml = render("https://ex.com/", &[post("b"), post("a")]);
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.contains("<loc>https://ex.com/p/b/</loc><priority>0.7</priority>"));
        assert!(xml.find("/p/b/").unwrap() < xml.find("/p/a/").unwrap());
    }
}
