//! CLI entry point for mdpress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdpress")]
#[command(version)]
#[command(about = "Turn a folder of Markdown posts into a static site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build pages, posts.json, sitemap.xml and rss.xml
    #[command(alias = "generate", alias = "g")]
    Build {
        /// Base URL for absolute links (overrides _config.yml and SITE_URL)
        #[arg(short, long)]
        url: Option<String>,

        /// Watch for file changes and rebuild
        #[arg(short, long)]
        watch: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug to use instead of one derived from the title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Remove generated pages and aggregate files
    Clean,

    /// List posts in publish order
    List,
}

fn load_site(base_dir: &Path, url: Option<&str>) -> Result<mdpress::Site> {
    let mut site = mdpress::Site::new(base_dir)?;
    if let Some(url) = url {
        site.config.set_url(url);
    }
    Ok(site)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdpress=debug,info"
    } else {
        "mdpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build { url, watch } => {
            let site = load_site(&base_dir, url.as_deref())?;
            tracing::info!("Building {:?} from {:?}", site.config.url, site.source_dir);

            let result = site.build()?;
            println!("Built {} posts", result.post_count);

            if watch {
                tokio::task::spawn_blocking(move || {
                    mdpress::commands::build::watch(&site, url.as_deref())
                })
                .await??;
            }
        }

        Commands::New { title, slug } => {
            let site = load_site(&base_dir, None)?;
            let path = site.new_post(&title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Clean => {
            let site = load_site(&base_dir, None)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let site = load_site(&base_dir, None)?;
            mdpress::commands::list::run(&site)?;
        }
    }

    Ok(())
}
