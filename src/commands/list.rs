//! List posts

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Print every post in publish order
pub fn run(site: &Site) -> Result<()> {
    let posts = Generator::new(site).load_posts()?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} [{}] ({})",
            post.date, post.title, post.slug, post.source
        );
    }

    Ok(())
}
