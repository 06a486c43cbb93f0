//! Staging and hashed naming of referenced media assets.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Planned copy of one referenced asset.
#[derive(Debug, Clone)]
pub struct AssetPlan {
    pub source: PathBuf,
    pub file_name: String,
}

/// Collects asset references during validation.
///
/// Copies are deferred to persist time, so an aborted build leaves the
/// output directories untouched.
#[derive(Debug, Default)]
pub struct AssetStore {
    base: String,
    staged: HashMap<PathBuf, String>,
    plans: Vec<AssetPlan>,
}

impl AssetStore {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            staged: HashMap::new(),
            plans: Vec::new(),
        }
    }

    /// Resolve `reference` against the record's source file, hash its
    /// contents and return the public URL it will be served from.
    ///
    /// The output name is `<stem>-<hash8>.<ext>`, so unchanged content keeps
    /// a stable name across builds.
    pub fn stage(&mut self, source_file: &Path, reference: &str) -> io::Result<String> {
        let parent = source_file.parent().unwrap_or_else(|| Path::new("."));
        let resolved = parent.join(reference);

        if let Some(name) = self.staged.get(&resolved) {
            return Ok(format!("{}{}", self.base, name));
        }

        let bytes = fs::read(&resolved)?;
        let digest = blake3::hash(&bytes);
        let hex = digest.to_hex();
        let short = &hex.as_str()[..8];

        let stem = resolved
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset");
        let file_name = match resolved.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}-{short}.{ext}"),
            None => format!("{stem}-{short}"),
        };

        self.staged.insert(resolved.clone(), file_name.clone());
        self.plans.push(AssetPlan {
            source: resolved,
            file_name: file_name.clone(),
        });

        Ok(format!("{}{}", self.base, file_name))
    }

    pub fn plans(&self) -> &[AssetPlan] {
        &self.plans
    }

    /// Copy every staged asset into `dest`.
    pub fn copy_all(&self, dest: &Path) -> io::Result<()> {
        if self.plans.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(dest)?;
        for plan in &self.plans {
            fs::copy(&plan.source, dest.join(&plan.file_name))?;
        }

        tracing::debug!("copied {} asset(s) to {:?}", self.plans.len(), dest);
        Ok(())
    }
}
