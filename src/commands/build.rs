//! Build the static site

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::{BuildResult, Generator};
use crate::{Site, CONFIG_FILE};

/// Quiet period before a burst of file events triggers a rebuild
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Build the whole site once
pub fn run(site: &Site) -> Result<BuildResult> {
    let start = std::time::Instant::now();

    let result = Generator::new(site).generate()?;

    let duration = start.elapsed();
    tracing::info!(
        "Built {} posts into {:?} in {:.2}s",
        result.post_count,
        site.public_dir,
        duration.as_secs_f64()
    );

    Ok(result)
}

/// Watch the sources and rebuild on change
///
/// Every rebuild is a full build with the config re-read from disk;
/// `url_override` is re-applied on top of it. A changed `source_dir` moves
/// the watch to the new directory. Blocks until the watcher disconnects.
pub fn watch(site: &Site, url_override: Option<&str>) -> Result<()> {
    let (tx, rx) = channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

    let mut watched_source = site.source_dir.clone();
    if watched_source.exists() {
        debouncer
            .watcher()
            .watch(&watched_source, RecursiveMode::NonRecursive)?;
    } else {
        tracing::warn!("Source directory {:?} does not exist, not watching it", watched_source);
    }

    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for events in rx {
        match events {
            Ok(events) => {
                tracing::info!("{} file(s) changed, rebuilding...", events.len());
                let site = match Site::new(&site.base_dir) {
                    Ok(mut reloaded) => {
                        if let Some(url) = url_override {
                            reloaded.config.set_url(url);
                        }
                        reloaded
                    }
                    Err(e) => {
                        tracing::error!("Failed to reload config: {:#}", e);
                        continue;
                    }
                };
                follow_source_dir(debouncer.watcher(), &mut watched_source, &site.source_dir);
                if let Err(e) = run(&site) {
                    tracing::error!("Build failed: {:#}", e);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Move the source watch when the reloaded config points elsewhere
fn follow_source_dir(watcher: &mut dyn Watcher, watched: &mut PathBuf, source_dir: &Path) {
    if watched.as_path() == source_dir {
        return;
    }
    let _ = watcher.unwatch(watched.as_path());
    match watcher.watch(source_dir, RecursiveMode::NonRecursive) {
        Ok(()) => tracing::info!("Now watching {:?}", source_dir),
        Err(e) => tracing::warn!("Cannot watch {:?}: {}", source_dir, e),
    }
    *watched = source_dir.to_path_buf();
}
