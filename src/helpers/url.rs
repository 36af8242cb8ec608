//! URL helper functions

/// Directory under the output root that holds one folder per post
pub const POST_DIR: &str = "p";

/// Generate a full URL from a base URL and a site-relative path
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/p/hello/") // -> "https://example.com/p/hello/"
/// ```
pub fn full_url_for(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Site-relative path of a post page, with trailing slash
pub fn post_path(slug: &str) -> String {
    format!("{}/{}/", POST_DIR, slug)
}

/// Whether a URL points off-site: `http://`, `https://` or protocol-relative `//`
pub fn is_absolute_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}
