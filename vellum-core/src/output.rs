//! Persistence of built collections and staged assets.

use crate::assets::AssetStore;
use crate::config::Config;
use crate::models::Collections;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Write one JSON data file per collection plus the staged assets.
///
/// `clean` removes prior output first. Callers only reach this after a
/// fully successful build, so a failed pass never leaves partial output.
pub fn persist(
    config: &Config,
    collections: &Collections,
    assets: &AssetStore,
    clean: bool,
) -> io::Result<()> {
    let data_dir = config.data_dir();
    let assets_dir = config.assets_dir();

    if clean {
        remove_dir(&data_dir)?;
        remove_dir(&assets_dir)?;
    }

    fs::create_dir_all(&data_dir)?;

    write_json(&data_dir, "options", &collections.options)?;
    write_json(&data_dir, "categories", &collections.categories)?;
    write_json(&data_dir, "tags", &collections.tags)?;
    write_json(&data_dir, "pages", &collections.pages)?;
    write_json(&data_dir, "posts", &collections.posts)?;

    assets.copy_all(&assets_dir)?;

    tracing::info!("wrote collection data to {:?}", data_dir);
    Ok(())
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> io::Result<()> {
    let path = dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json)?;
    tracing::debug!("wrote {:?}", path);
    Ok(())
}

fn remove_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_dir_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_dir(&dir.path().join("not-there")).is_ok());
    }

    #[test]
    fn test_write_json_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        write_json(dir.path(), "sample", &vec!["a", "b"]).unwrap();

        let written = fs::read_to_string(dir.path().join("sample.json")).unwrap();
        assert!(written.contains("\"a\""));
        assert!(written.starts_with('['));
    }
}
