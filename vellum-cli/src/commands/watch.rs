//! Watch mode: rebuild collections whenever the content root changes.

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use vellum_core::{Config, Mode, Pipeline};

pub fn watch(config_path: &Path) -> Result<()> {
    let config = Config::from_file(config_path).context("failed to load configuration")?;
    let content_dir = config.content_dir();

    let mut pipeline = Pipeline::new(config, Mode::Development);
    match pipeline.start(false) {
        Ok(Some(summary)) if !summary.is_success() => {
            tracing::error!("{} record(s) failed validation", summary.errors.len());
        }
        Ok(_) => {}
        Err(err) => tracing::error!("initial build failed: {err}"),
    }

    println!("Watching {:?} for changes (Ctrl+C to stop)...", content_dir);

    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )
    .context("failed to initialize watcher")?;

    watcher
        .watch(&content_dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {:?}", content_dir))?;

    while let Ok(event) = rx.recv() {
        match event {
            Ok(event) if is_content_change(&event.kind) => {
                // Coalesce bursts of events from editors writing several files
                while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}

                tracing::info!("content changed; rebuilding");
                match pipeline.rebuild() {
                    Ok(summary) if summary.is_success() => {
                        tracing::info!("rebuilt {} record(s)", summary.records);
                    }
                    Ok(summary) => {
                        tracing::error!(
                            "{} record(s) failed validation",
                            summary.errors.len()
                        );
                    }
                    Err(err) => tracing::error!("rebuild failed: {err}"),
                }
            }
            Ok(_) => {}
            Err(err) => tracing::error!("watcher error: {err}"),
        }
    }

    Ok(())
}

fn is_content_change(kind: &notify::EventKind) -> bool {
    use notify::EventKind;

    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
