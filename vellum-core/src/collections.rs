//! Declarative collection definitions for the site content model.
//!
//! This is the one place that says what content exists: each collection
//! names its glob pattern, cardinality, schema and derived-permalink
//! transform. The builder walks these definitions; it knows nothing about
//! individual content types.

use crate::schema::{
    Array, Bool, Enumeration, Excerpt, FileRef, Image, IsoDate, MarkdownBody, Metadata, Num,
    Object, Slug, Str, Timestamp, Toc, ValidatorExt, WithDefault,
};
use crate::slug::SlugScope;
use serde_json::{json, Map, Value as Json};

/// Slugs rejected in every scope.
pub const RESERVED_SLUGS: &[&str] = &["admin", "login"];

/// Per-record transform applied after schema validation succeeds.
///
/// Transforms are deterministic and may only touch the record they are
/// given; a failure fails that record alone.
pub type Transform = fn(&mut Map<String, Json>) -> Result<(), String>;

/// One content collection: a glob over the content root plus its schema.
pub struct Collection {
    pub name: &'static str,
    pub pattern: &'static str,
    pub single: bool,
    pub schema: Object,
    pub transform: Option<Transform>,
}

/// The collections backing the site, in build order.
pub fn site_collections() -> Vec<Collection> {
    vec![options(), categories(), tags(), pages(), posts()]
}

fn options() -> Collection {
    Collection {
        name: "options",
        pattern: "options/index.yml",
        single: true,
        schema: Object::new()
            .field("name", Str::new().max(20))
            .field("title", Str::new().max(99))
            .field("description", Str::new().max(999).optional())
            .field("keywords", Array::of(Str::new()))
            .field(
                "author",
                Object::new()
                    .field("name", Str::new())
                    .field("email", Str::new().email())
                    .field("url", Str::new().url()),
            )
            .field(
                "links",
                Array::of(
                    Object::new()
                        .field("text", Str::new())
                        .field("link", Str::new())
                        .field(
                            "type",
                            Enumeration::of(&["navigation", "footer", "copyright"]),
                        ),
                ),
            )
            .field(
                "socials",
                Array::of(
                    Object::new()
                        .field("name", Str::new())
                        .field(
                            "icon",
                            Enumeration::of(&[
                                "github",
                                "instagram",
                                "medium",
                                "twitter",
                                "youtube",
                            ]),
                        )
                        .field("link", Str::new().optional())
                        .field("image", Image.optional()),
                ),
            ),
        transform: None,
    }
}

fn categories() -> Collection {
    Collection {
        name: "categories",
        pattern: "categories/*.yml",
        single: false,
        schema: taxonomy_schema(),
        transform: Some(root_permalink),
    }
}

fn tags() -> Collection {
    Collection {
        name: "tags",
        pattern: "tags/index.yml",
        single: false,
        schema: taxonomy_schema(),
        transform: Some(root_permalink),
    }
}

fn pages() -> Collection {
    Collection {
        name: "pages",
        pattern: "pages/**/*.mdx",
        single: false,
        schema: Object::new()
            .field("title", Str::new().max(99))
            .field(
                "slug",
                Slug::new(SlugScope::Global).reserved(RESERVED_SLUGS),
            )
            .field("body", MarkdownBody),
        transform: Some(root_permalink),
    }
}

fn posts() -> Collection {
    Collection {
        name: "posts",
        pattern: "posts/**/*.md",
        single: false,
        schema: Object::new()
            .field("title", Str::new().max(99))
            .field("slug", Slug::new(SlugScope::Post))
            .field("date", IsoDate)
            .field("updated", Timestamp)
            .field("cover", Image.optional())
            .field("video", FileRef.optional())
            .field("description", Str::new().max(999).optional())
            .field("draft", Bool.default_value(json!(false)))
            .field("featured", Bool.default_value(json!(false)))
            .field(
                "categories",
                Array::of(Str::new()).default_value(json!(["Journal"])),
            )
            .field("tags", Array::of(Str::new()).default_value(json!([])))
            .field("meta", meta_schema())
            .field("toc", Toc)
            .field("metadata", Metadata)
            .field("excerpt", Excerpt)
            .field("content", MarkdownBody),
        transform: Some(blog_permalink),
    }
}

fn taxonomy_schema() -> Object {
    Object::new()
        .field("name", Str::new().max(20))
        .field(
            "slug",
            Slug::new(SlugScope::Global).reserved(RESERVED_SLUGS),
        )
        .field("cover", Image.optional())
        .field("description", Str::new().max(999).optional())
        .field("count", count_schema())
}

fn count_schema() -> WithDefault<Object> {
    Object::new()
        .field("total", Num)
        .field("posts", Num)
        .default_value(json!({ "total": 0, "posts": 0 }))
}

fn meta_schema() -> WithDefault<Object> {
    Object::new()
        .field("title", Str::new().optional())
        .field("description", Str::new().optional())
        .field("keywords", Array::of(Str::new()).optional())
        .default_value(json!({}))
}

fn root_permalink(record: &mut Map<String, Json>) -> Result<(), String> {
    let slug = record_slug(record)?;
    record.insert("permalink".to_string(), Json::String(format!("/{slug}")));
    Ok(())
}

fn blog_permalink(record: &mut Map<String, Json>) -> Result<(), String> {
    let slug = record_slug(record)?;
    record.insert(
        "permalink".to_string(),
        Json::String(format!("/blog/{slug}")),
    );
    Ok(())
}

fn record_slug(record: &Map<String, Json>) -> Result<String, String> {
    record
        .get("slug")
        .and_then(Json::as_str)
        .map(str::to_string)
        .ok_or_else(|| "record has no slug".to_string())
}
