//! Content module - parses, renders and resolves posts

mod frontmatter;
pub mod loader;
pub mod markdown;
mod post;
pub mod slug;

pub use frontmatter::{FrontMatter, ParsedDocument};
pub use markdown::{Fragment, MarkdownRenderer};
pub use post::{first_heading, first_image, PostResolver, ResolvedPost, FALLBACK_SLUG};
