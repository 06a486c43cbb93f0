//! Validators derived from the document body rather than front-matter.
//!
//! These ignore any authored value; they exist so derived fields slot into
//! the same object schema as everything else.

use super::{FieldContext, SchemaError, Validator};
use serde_json::Value as Json;
use serde_yaml::Value as Yaml;

/// Rendered HTML of the markdown body.
pub struct MarkdownBody;

impl Validator for MarkdownBody {
    fn validate(&self, _raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        Ok(Json::String(ctx.rendered().html.clone()))
    }
}

/// Plain-text excerpt taken from the body's first paragraph.
pub struct Excerpt;

impl Validator for Excerpt {
    fn validate(&self, _raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        Ok(Json::String(ctx.rendered().excerpt.clone()))
    }
}

/// Flattened table of contents collected from the body's headings.
pub struct Toc;

impl Validator for Toc {
    fn validate(&self, _raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let toc = &ctx.rendered().toc;
        serde_json::to_value(toc).map_err(|err| SchemaError::Invalid {
            field: ctx.pointer(),
            message: err.to_string(),
        })
    }
}

/// Word count and reading time for the body.
pub struct Metadata;

impl Validator for Metadata {
    fn validate(&self, _raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let meta = &ctx.rendered().meta;
        serde_json::to_value(meta).map_err(|err| SchemaError::Invalid {
            field: ctx.pointer(),
            message: err.to_string(),
        })
    }
}
