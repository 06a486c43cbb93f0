//! Build orchestration: discovery, validation, aggregation, persistence.

use crate::assets::AssetStore;
use crate::collections::{site_collections, Collection};
use crate::config::{Config, Mode};
use crate::markdown::MarkdownRenderer;
use crate::matter::{self, MatterError};
use crate::models::Collections;
use crate::output;
use crate::prepare::{self, Outcome, PrepareError};
use crate::schema::{FieldContext, Validator};
use crate::slug::SlugRegistry;
use serde_json::Value as Json;
use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("single-record collection `{collection}` failed: {reason}")]
    Single {
        collection: &'static str,
        reason: String,
    },

    #[error("aggregation failed: {0}")]
    Prepare(#[from] PrepareError),

    #[error("failed to decode built collections: {0}")]
    Decode(serde_json::Error),
}

/// One failed record in a multi-record collection.
#[derive(Debug)]
pub struct RecordError {
    pub collection: &'static str,
    pub file: String,
    pub message: String,
}

/// Advisory attached to a record that didn't block the build.
#[derive(Debug)]
pub struct RecordWarning {
    pub collection: &'static str,
    pub file: String,
    pub field: String,
    pub message: String,
}

/// Result of one build pass.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Records that validated across all collections.
    pub records: usize,
    pub errors: Vec<RecordError>,
    pub warnings: Vec<RecordWarning>,
    /// Whether output was persisted.
    pub written: bool,
}

impl BuildSummary {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Owns one process's pipeline state, including the once-only start guard.
pub struct Pipeline {
    config: Config,
    mode: Mode,
    renderer: MarkdownRenderer,
    started: bool,
}

impl Pipeline {
    pub fn new(config: Config, mode: Mode) -> Self {
        Self {
            config,
            mode,
            renderer: MarkdownRenderer::new(),
            started: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Entry point for the host framework. At most one start per process:
    /// a duplicate trigger logs a warning and returns `None`.
    pub fn start(&mut self, clean: bool) -> Result<Option<BuildSummary>, BuildError> {
        if self.started {
            tracing::warn!("collection build already started; ignoring duplicate trigger");
            return Ok(None);
        }
        self.started = true;
        self.build(clean).map(Some)
    }

    /// Re-run the pass after a source change (watch mode). Bypasses the
    /// start guard.
    pub fn rebuild(&self) -> Result<BuildSummary, BuildError> {
        self.build(false)
    }

    fn build(&self, clean: bool) -> Result<BuildSummary, BuildError> {
        let content_dir = self.config.content_dir();
        tracing::info!("building collections from {:?}", content_dir);

        let mut registry = SlugRegistry::new();
        let mut assets = AssetStore::new(self.config.output.base.clone());
        let mut summary = BuildSummary::default();
        let mut built: BTreeMap<&'static str, Json> = BTreeMap::new();

        for collection in site_collections() {
            let records = self.build_collection(
                &collection,
                &content_dir,
                &mut registry,
                &mut assets,
                &mut summary,
            )?;
            built.insert(collection.name, records);
        }

        let mut collections = decode(built)?;

        let outcome = prepare::prepare(&mut collections, self.mode)?;

        if !summary.errors.is_empty() {
            tracing::error!(
                "{} record(s) failed validation; output not written",
                summary.errors.len()
            );
            return Ok(summary);
        }

        match outcome {
            Outcome::Skip => {
                tracing::info!("prepare step vetoed persistence; output not written");
            }
            Outcome::Persist => {
                output::persist(&self.config, &collections, &assets, clean)?;
                summary.written = true;
            }
        }

        Ok(summary)
    }

    fn build_collection(
        &self,
        collection: &Collection,
        content_dir: &Path,
        registry: &mut SlugRegistry,
        assets: &mut AssetStore,
        summary: &mut BuildSummary,
    ) -> Result<Json, BuildError> {
        let pattern = content_dir.join(collection.pattern);
        let pattern = pattern.to_string_lossy().into_owned();

        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|source| BuildError::Pattern {
                pattern: pattern.clone(),
                source,
            })?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(err) => {
                    tracing::warn!("skipping unreadable path: {err}");
                    None
                }
            })
            .collect();
        files.sort();

        tracing::debug!(
            "collection `{}` matched {} source file(s)",
            collection.name,
            files.len()
        );

        let mut records: Vec<Json> = Vec::new();
        for file in &files {
            let rel = file
                .strip_prefix(content_dir)
                .unwrap_or(file)
                .to_string_lossy()
                .into_owned();

            let documents = match read_documents(file) {
                Ok(documents) => documents,
                Err(err) => {
                    self.fail_record(collection, &rel, err.to_string(), summary)?;
                    continue;
                }
            };

            for (raw, body) in documents {
                let mut warnings = Vec::new();
                let validated = {
                    let mut ctx = FieldContext::new(
                        file,
                        &rel,
                        &body,
                        &self.renderer,
                        registry,
                        assets,
                        &mut warnings,
                    );
                    collection.schema.validate(Some(&raw), &mut ctx)
                };

                for warning in warnings {
                    tracing::warn!("{rel}: field `{}`: {}", warning.field, warning.message);
                    summary.warnings.push(RecordWarning {
                        collection: collection.name,
                        file: rel.clone(),
                        field: warning.field,
                        message: warning.message,
                    });
                }

                let transformed = validated
                    .map_err(|err| err.to_string())
                    .and_then(|value| apply_transform(collection, value));

                match transformed {
                    Ok(value) => records.push(value),
                    Err(message) => self.fail_record(collection, &rel, message, summary)?,
                }
            }
        }

        summary.records += records.len();

        if collection.single {
            if records.len() != 1 {
                return Err(BuildError::Single {
                    collection: collection.name,
                    reason: format!("expected exactly one record, found {}", records.len()),
                });
            }
            Ok(records.pop().unwrap_or(Json::Null))
        } else {
            Ok(Json::Array(records))
        }
    }

    /// Record a per-record failure, escalating to a build abort for
    /// single-cardinality collections.
    fn fail_record(
        &self,
        collection: &Collection,
        file: &str,
        message: String,
        summary: &mut BuildSummary,
    ) -> Result<(), BuildError> {
        if collection.single {
            return Err(BuildError::Single {
                collection: collection.name,
                reason: format!("{file}: {message}"),
            });
        }

        tracing::error!("{file}: {message}");
        summary.errors.push(RecordError {
            collection: collection.name,
            file: file.to_string(),
            message,
        });
        Ok(())
    }
}

fn apply_transform(collection: &Collection, mut value: Json) -> Result<Json, String> {
    let Some(transform) = collection.transform else {
        return Ok(value);
    };
    let Some(record) = value.as_object_mut() else {
        return Err("record is not an object".to_string());
    };
    transform(record)?;
    Ok(value)
}

#[derive(Error, Debug)]
enum ReadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Matter(#[from] MatterError),
}

/// Parse one source file into raw (front-matter, body) documents.
///
/// Markdown and MDX sources carry front-matter and a body. YAML sources are
/// data-only; a top-level sequence yields one record per element, which is
/// how a single index file can hold a whole collection.
fn read_documents(path: &Path) -> Result<Vec<(Yaml, String)>, ReadError> {
    let content = fs::read_to_string(path)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "md" | "mdx" | "markdown" => {
            let (raw, body) = matter::split(&content)?;
            Ok(vec![(raw, body)])
        }
        _ => {
            let value = matter::parse_yaml(&content)?;
            match value {
                Yaml::Sequence(items) => Ok(items
                    .into_iter()
                    .map(|item| (item, String::new()))
                    .collect()),
                Yaml::Null => Ok(Vec::new()),
                other => Ok(vec![(other, String::new())]),
            }
        }
    }
}

fn decode(built: BTreeMap<&'static str, Json>) -> Result<Collections, BuildError> {
    let mut object = serde_json::Map::new();
    for (name, records) in built {
        object.insert(name.to_string(), records);
    }
    serde_json::from_value(Json::Object(object)).map_err(BuildError::Decode)
}
