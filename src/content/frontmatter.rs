//! Front-matter parsing

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref HEADER_LINE: Regex = Regex::new(r"^([A-Za-z0-9_]+)\s*:\s*(.+)$").unwrap();
}

const DELIMITER: &str = "---";

/// Front-matter data from a post
///
/// Only the recognized keys are kept; anything else in the header is ignored.
/// Absent keys are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: String,
    pub slug: String,
    pub thumb: String,
}

/// A document split into its front matter and Markdown body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

impl FrontMatter {
    /// Split a raw document into front matter and body
    ///
    /// A header block opens with `---` at offset 0 and closes at the first
    /// `\n---` after it. Without both delimiters the whole input is the body.
    pub fn parse(raw: &str) -> ParsedDocument<'_> {
        if let Some(rest) = raw.strip_prefix(DELIMITER) {
            if let Some(end) = rest.find("\n---") {
                let header = rest[..end].trim();
                let remaining = &rest[end + 4..];
                let body = remaining
                    .strip_prefix("\r\n")
                    .or_else(|| remaining.strip_prefix('\n'))
                    .unwrap_or(remaining);

                return ParsedDocument {
                    front_matter: Self::from_header(header),
                    body,
                };
            }
            tracing::debug!("Front-matter block has no closing delimiter, treating as body");
        }

        ParsedDocument {
            front_matter: FrontMatter::default(),
            body: raw,
        }
    }

    /// Build front matter from the lines of a header block
    fn from_header(header: &str) -> Self {
        let mut fm = FrontMatter::default();
        for line in header.lines() {
            if let Some(caps) = HEADER_LINE.captures(line) {
                fm.set(&caps[1], caps[2].trim());
            }
        }
        fm
    }

    /// Set a key case-insensitively; unrecognized keys are ignored
    pub fn set(&mut self, key: &str, value: &str) {
        let slot = match key.to_ascii_lowercase().as_str() {
            "title" => &mut self.title,
            "date" => &mut self.date,
            "slug" => &mut self.slug,
            "thumb" => &mut self.thumb,
            _ => return,
        };
        *slot = value.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_body() {
        let body = "# Hello\n\nThis is the content.\n";
        let content = format!(
            "---\ntitle: Hello World\ndate: 2024-01-15\nslug: hello\nthumb: /img/a.png\n---\n{}",
            body
        );

        let parsed = FrontMatter::parse(&content);
        assert_eq!(parsed.front_matter.title, "Hello World");
        assert_eq!(parsed.front_matter.date, "2024-01-15");
        assert_eq!(parsed.front_matter.slug, "hello");
        assert_eq!(parsed.front_matter.thumb, "/img/a.png");
        assert_eq!(parsed.body, body);
    }

    #[test]
    fn test_only_one_leading_newline_stripped() {
        let parsed = FrontMatter::parse("---\ntitle: T\n---\n\nBody");
        assert_eq!(parsed.body, "\nBody");

        let parsed = FrontMatter::parse("---\r\ntitle: T\r\n---\r\nBody");
        assert_eq!(parsed.front_matter.title, "T");
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_no_header() {
        let parsed = FrontMatter::parse("no header here");
        assert_eq!(parsed.front_matter, FrontMatter::default());
        assert_eq!(parsed.body, "no header here");
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let content = "---\ntitle: Never closed\n\nBody text";
        let parsed = FrontMatter::parse(content);
        assert_eq!(parsed.front_matter, FrontMatter::default());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let parsed = FrontMatter::parse("---\nTITLE: Loud\nDate : 2024-02-02\n---\n");
        assert_eq!(parsed.front_matter.title, "Loud");
        assert_eq!(parsed.front_matter.date, "2024-02-02");
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_malformed_and_unknown_lines_skipped() {
        let content = "---\njust prose\n  title: indented\ntags: a, b\n: no key\nslug: ok\n---\nBody";
        let parsed = FrontMatter::parse(content);
        assert_eq!(parsed.front_matter.title, "");
        assert_eq!(parsed.front_matter.slug, "ok");
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_value_keeps_inner_colons() {
        let parsed = FrontMatter::parse("---\nthumb: https://cdn.example.com/a.png\n---\n");
        assert_eq!(parsed.front_matter.thumb, "https://cdn.example.com/a.png");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let parsed = FrontMatter::parse("---\ntitle: First\ntitle: Second\n---\n");
        assert_eq!(parsed.front_matter.title, "Second");
    }

    #[test]
    fn test_delimiter_must_be_at_start() {
        let content = "\n---\ntitle: Late\n---\nBody";
        let parsed = FrontMatter::parse(content);
        assert_eq!(parsed.front_matter.title, "");
        assert_eq!(parsed.body, content);
    }
}
