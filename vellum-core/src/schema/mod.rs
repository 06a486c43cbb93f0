//! Composable schema validation over raw front-matter values.
//!
//! Every field of a record is checked by a [`Validator`], which consumes the
//! raw YAML value (or its absence) and produces a validated JSON value.
//! Combinators build objects and arrays out of field validators, apply
//! defaults, and compute derived fields; the typed record structs in
//! [`crate::models`] are decoded from the validated output.

pub mod content;
pub mod fields;

use crate::assets::AssetStore;
use crate::markdown::{MarkdownRenderer, Rendered};
use crate::slug::SlugRegistry;
use serde_json::Value as Json;
use serde_yaml::Value as Yaml;
use std::cell::OnceCell;
use std::path::Path;
use thiserror::Error;

pub use content::{Excerpt, MarkdownBody, Metadata, Toc};
pub use fields::{
    Array, Bool, Enumeration, FileRef, Image, IsoDate, Num, Object, Optional, Slug, Str, Timestamp,
    WithDefault,
};

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("field `{field}`: expected {expected}, found {found}")]
    Type {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` is required")]
    Missing { field: String },

    #[error("field `{field}`: {message}")]
    Invalid { field: String, message: String },

    #[error("field `{field}`: duplicate slug `{slug}` in `{scope}` scope")]
    DuplicateSlug {
        field: String,
        slug: String,
        scope: &'static str,
    },

    #[error("field `{field}`: slug `{slug}` is reserved")]
    ReservedSlug { field: String, slug: String },

    #[error("field `{field}`: failed to read `{path}`: {source}")]
    Read {
        field: String,
        path: String,
        source: std::io::Error,
    },
}

/// Non-fatal advisory raised while validating a record.
#[derive(Debug, Clone)]
pub struct Warning {
    pub field: String,
    pub message: String,
}

/// Per-record state shared by validators.
pub struct FieldContext<'a> {
    /// Absolute path of the source file.
    pub file: &'a Path,
    /// Path relative to the content root, for reporting.
    pub rel: &'a str,
    /// Markdown body; empty for pure YAML sources.
    pub body: &'a str,
    pub renderer: &'a MarkdownRenderer,
    pub slugs: &'a mut SlugRegistry,
    pub assets: &'a mut AssetStore,
    pub warnings: &'a mut Vec<Warning>,
    path: Vec<String>,
    rendered: OnceCell<Rendered>,
}

impl<'a> FieldContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        file: &'a Path,
        rel: &'a str,
        body: &'a str,
        renderer: &'a MarkdownRenderer,
        slugs: &'a mut SlugRegistry,
        assets: &'a mut AssetStore,
        warnings: &'a mut Vec<Warning>,
    ) -> Self {
        Self {
            file,
            rel,
            body,
            renderer,
            slugs,
            assets,
            warnings,
            path: Vec::new(),
            rendered: OnceCell::new(),
        }
    }

    /// Dotted pointer to the field currently being validated.
    pub fn pointer(&self) -> String {
        if self.path.is_empty() {
            "<record>".to_string()
        } else {
            self.path.join(".")
        }
    }

    /// Body rendered at most once per record, shared by the derived-field
    /// validators.
    pub fn rendered(&self) -> &Rendered {
        self.rendered
            .get_or_init(|| self.renderer.render(self.body))
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let warning = Warning {
            field: self.pointer(),
            message: message.into(),
        };
        self.warnings.push(warning);
    }

    pub(crate) fn enter(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

/// A composable field validator.
///
/// `raw` is `None` when the source field is absent, which is the only case
/// where defaults apply; an explicit null arrives as `Some(Value::Null)`.
pub trait Validator {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError>;
}

/// Combinator sugar available on every validator.
pub trait ValidatorExt: Validator + Sized {
    /// Absent and explicit-null values become JSON null instead of an error.
    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    /// Substitute `default` when the source field is absent.
    fn default_value(self, default: Json) -> WithDefault<Self> {
        WithDefault::new(self, default)
    }
}

impl<V: Validator> ValidatorExt for V {}

pub(crate) fn yaml_type(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}
