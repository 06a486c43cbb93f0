//! One-shot collection build.

use anyhow::{bail, Context, Result};
use std::path::Path;
use vellum_core::{Config, Mode, Pipeline};

pub fn build(config_path: &Path, clean: bool, drafts: bool) -> Result<()> {
    tracing::info!("loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("failed to load configuration")?;

    let mode = if drafts {
        Mode::Development
    } else {
        Mode::Production
    };

    let mut pipeline = Pipeline::new(config, mode);
    let summary = pipeline
        .start(clean)
        .context("collection build failed")?;
    let Some(summary) = summary else {
        bail!("collection build was already triggered in this process");
    };

    if !summary.is_success() {
        bail!("{} record(s) failed validation", summary.errors.len());
    }

    tracing::info!("✓ built {} record(s)", summary.records);
    Ok(())
}
