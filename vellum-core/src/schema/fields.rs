//! Primitive, combinator and reference validators.

use super::{yaml_type, FieldContext, SchemaError, Validator};
use crate::slug::{self, SlugScope};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value as Json;
use serde_yaml::Value as Yaml;

fn require<'v>(raw: Option<&'v Yaml>, ctx: &FieldContext) -> Result<&'v Yaml, SchemaError> {
    raw.ok_or_else(|| SchemaError::Missing {
        field: ctx.pointer(),
    })
}

fn type_error(ctx: &FieldContext, expected: &'static str, found: &Yaml) -> SchemaError {
    SchemaError::Type {
        field: ctx.pointer(),
        expected,
        found: yaml_type(found),
    }
}

fn invalid(ctx: &FieldContext, message: impl Into<String>) -> SchemaError {
    SchemaError::Invalid {
        field: ctx.pointer(),
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrFormat {
    Email,
    Url,
}

/// Bounded string, optionally checked against a format.
#[derive(Default)]
pub struct Str {
    max: Option<usize>,
    format: Option<StrFormat>,
}

impl Str {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max(mut self, limit: usize) -> Self {
        self.max = Some(limit);
        self
    }

    pub fn email(mut self) -> Self {
        self.format = Some(StrFormat::Email);
        self
    }

    pub fn url(mut self) -> Self {
        self.format = Some(StrFormat::Url);
        self
    }
}

impl Validator for Str {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        let Some(s) = value.as_str() else {
            return Err(type_error(ctx, "string", value));
        };

        if let Some(max) = self.max {
            let len = s.chars().count();
            if len > max {
                return Err(invalid(
                    ctx,
                    format!("must be at most {max} characters, got {len}"),
                ));
            }
        }

        match self.format {
            Some(StrFormat::Email) if !looks_like_email(s) => {
                Err(invalid(ctx, format!("`{s}` is not a valid email address")))
            }
            Some(StrFormat::Url) if !looks_like_url(s) => {
                Err(invalid(ctx, format!("`{s}` is not a valid URL")))
            }
            _ => Ok(Json::String(s.to_string())),
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// String restricted to a fixed set of values.
pub struct Enumeration {
    allowed: Vec<&'static str>,
}

impl Enumeration {
    pub fn of(allowed: &[&'static str]) -> Self {
        Self {
            allowed: allowed.to_vec(),
        }
    }
}

impl Validator for Enumeration {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        let Some(s) = value.as_str() else {
            return Err(type_error(ctx, "string", value));
        };
        if !self.allowed.contains(&s) {
            return Err(invalid(
                ctx,
                format!("`{s}` is not one of {}", self.allowed.join(", ")),
            ));
        }
        Ok(Json::String(s.to_string()))
    }
}

pub struct Bool;

impl Validator for Bool {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        match value.as_bool() {
            Some(b) => Ok(Json::Bool(b)),
            None => Err(type_error(ctx, "boolean", value)),
        }
    }
}

/// Non-negative integer.
pub struct Num;

impl Validator for Num {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        match value.as_u64() {
            Some(n) => Ok(Json::Number(n.into())),
            None => Err(type_error(ctx, "non-negative integer", value)),
        }
    }
}

/// Sequence applying `item` to every element.
pub struct Array<V> {
    item: V,
}

impl<V> Array<V> {
    pub fn of(item: V) -> Self {
        Self { item }
    }
}

impl<V: Validator> Validator for Array<V> {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        let Some(sequence) = value.as_sequence() else {
            return Err(type_error(ctx, "sequence", value));
        };

        let mut out = Vec::with_capacity(sequence.len());
        for (index, element) in sequence.iter().enumerate() {
            ctx.enter(index.to_string());
            let validated = self.item.validate(Some(element), ctx);
            ctx.leave();
            out.push(validated?);
        }
        Ok(Json::Array(out))
    }
}

/// Mapping with declared fields, validated recursively in declaration
/// order. Undeclared keys are dropped from the output.
#[derive(Default)]
pub struct Object {
    declared: Vec<(&'static str, Box<dyn Validator>)>,
}

impl Object {
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, validator: impl Validator + 'static) -> Self {
        self.declared.push((name, Box::new(validator)));
        self
    }
}

impl Validator for Object {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        let Some(mapping) = value.as_mapping() else {
            return Err(type_error(ctx, "mapping", value));
        };

        let mut out = serde_json::Map::with_capacity(self.declared.len());
        for (name, validator) in &self.declared {
            let key = Yaml::String((*name).to_string());
            ctx.enter(*name);
            let validated = validator.validate(mapping.get(&key), ctx);
            ctx.leave();
            out.insert((*name).to_string(), validated?);
        }
        Ok(Json::Object(out))
    }
}

/// Absent and explicit-null values pass through as JSON null.
pub struct Optional<V> {
    inner: V,
}

impl<V> Optional<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<V: Validator> Validator for Optional<V> {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        match raw {
            None | Some(Yaml::Null) => Ok(Json::Null),
            Some(value) => self.inner.validate(Some(value), ctx),
        }
    }
}

/// Applies `default` only when the source field is absent.
///
/// Explicit null and explicit empty collections reach the inner validator
/// as provided, so `tags: []` stays empty instead of being defaulted.
pub struct WithDefault<V> {
    inner: V,
    default: Json,
}

impl<V> WithDefault<V> {
    pub fn new(inner: V, default: Json) -> Self {
        Self { inner, default }
    }
}

impl<V: Validator> Validator for WithDefault<V> {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        match raw {
            None => Ok(self.default.clone()),
            Some(value) => self.inner.validate(Some(value), ctx),
        }
    }
}

/// Unique slug within a named scope, with a reserved-word set.
pub struct Slug {
    scope: SlugScope,
    reserved: Vec<&'static str>,
}

impl Slug {
    pub fn new(scope: SlugScope) -> Self {
        Self {
            scope,
            reserved: Vec::new(),
        }
    }

    pub fn reserved(mut self, words: &[&'static str]) -> Self {
        self.reserved = words.to_vec();
        self
    }
}

impl Validator for Slug {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        let Some(s) = value.as_str() else {
            return Err(type_error(ctx, "string", value));
        };

        if !slug::is_well_formed(s) {
            return Err(invalid(
                ctx,
                format!("`{s}` is not a valid slug (lowercase alphanumerics and hyphens)"),
            ));
        }
        if self.reserved.contains(&s) {
            return Err(SchemaError::ReservedSlug {
                field: ctx.pointer(),
                slug: s.to_string(),
            });
        }
        if !ctx.slugs.claim(self.scope, s) {
            return Err(SchemaError::DuplicateSlug {
                field: ctx.pointer(),
                slug: s.to_string(),
                scope: self.scope.as_str(),
            });
        }

        Ok(Json::String(s.to_string()))
    }
}

/// ISO-8601 date or datetime, normalized to RFC 3339 UTC.
pub struct IsoDate;

impl Validator for IsoDate {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        let value = require(raw, ctx)?;
        let Some(s) = value.as_str() else {
            return Err(type_error(ctx, "string", value));
        };

        let parsed = DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
            });

        match parsed {
            Ok(dt) => Ok(Json::String(
                dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            Err(_) => Err(invalid(ctx, format!("`{s}` is not an ISO-8601 date"))),
        }
    }
}

/// Last-modified timestamp of the record's source file.
///
/// Authored values are not honored: the field always resolves from the
/// file's mtime, and supplying a value raises a non-fatal warning. This
/// mismatch with what the field looks like it does is deliberate.
pub struct Timestamp;

impl Validator for Timestamp {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        if raw.is_some_and(|v| !v.is_null()) {
            ctx.warn("resolved from the file's modified time; the supplied value is ignored");
        }

        let stat = std::fs::metadata(ctx.file).map_err(|source| SchemaError::Read {
            field: ctx.pointer(),
            path: ctx.file.display().to_string(),
            source,
        })?;
        let modified = stat.modified().map_err(|source| SchemaError::Read {
            field: ctx.pointer(),
            path: ctx.file.display().to_string(),
            source,
        })?;

        let stamp: DateTime<Utc> = modified.into();
        Ok(Json::String(
            stamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        ))
    }
}

/// Media reference staged into the assets directory under a hashed name.
pub struct Image;

impl Validator for Image {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        stage_asset(raw, ctx)
    }
}

/// Arbitrary file reference, handled like [`Image`].
pub struct FileRef;

impl Validator for FileRef {
    fn validate(&self, raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
        stage_asset(raw, ctx)
    }
}

fn stage_asset(raw: Option<&Yaml>, ctx: &mut FieldContext) -> Result<Json, SchemaError> {
    let value = require(raw, ctx)?;
    let Some(reference) = value.as_str() else {
        return Err(type_error(ctx, "string", value));
    };

    let field = ctx.pointer();
    let url = ctx
        .assets
        .stage(ctx.file, reference)
        .map_err(|source| SchemaError::Read {
            field,
            path: reference.to_string(),
            source,
        })?;
    Ok(Json::String(url))
}
