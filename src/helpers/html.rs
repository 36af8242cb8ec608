//! HTML and XML helper functions

/// Escape HTML special characters for use inside attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text content (quotes are left alone)
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip HTML tags from a string, replacing each tag with a space
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => {
                in_tag = true;
                result.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Reverse the entities produced by [`html_escape`] and [`escape_text`]
pub fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Plain-text summary of a rendered fragment: tags stripped, entities
/// decoded, whitespace collapsed, cut to `length` chars
pub fn summarize(html: &str, length: usize) -> String {
    let text = decode_entities(&strip_html(html))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let truncated: String = text.chars().take(length).collect();
    truncated.trim_end().to_string()
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_text(r#"1 < 2 "ok""#), r#"1 &lt; 2 "ok""#);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <b>World</b></p>").split_whitespace().collect::<Vec<_>>(),
            vec!["Hello", "World"]
        );
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize("<h1>Title</h1>\n<p>Body text</p>", 8), "Title Bo");
        assert_eq!(summarize("<h1>Title</h1>\n<p>Body text</p>", 6), "Title");
        assert_eq!(summarize("<p>짧은 글</p>", 140), "짧은 글");
        assert_eq!(
            summarize("<p>Tom &amp; Jerry &lt;3 &amp;lt;</p>", 140),
            "Tom & Jerry <3 &lt;"
        );
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("a\u{0001}b\tc"), "ab\tc");
    }
}
