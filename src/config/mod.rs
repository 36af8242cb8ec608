//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::{DEFAULT_URL, SITE_URL_ENV};
