//! Helper functions shared by the renderer, the page template and the generator
//!
//! Escaping, URL joining and date handling live here so every artifact
//! computes them the same way.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
