//! Post-build aggregation across collections.
//!
//! Runs exactly once per build, after every collection is assembled. It is
//! the only place records from different collections see each other:
//! taxonomy entries referenced by posts but never declared are synthesized,
//! usage counts are recomputed from the published subset, and permalinks
//! are rewritten so they can never go stale.

use crate::config::Mode;
use crate::models::{Collections, Post, Taxonomy};
use crate::slug::slugify;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("cannot derive a slug for referenced name `{name}`")]
    EmptySlug { name: String },
}

/// Whether this build's output should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Persist,
    /// Escape hatch: leave previously written data untouched.
    Skip,
}

/// Aggregation pass over the fully built collections, mutating them in
/// place. No filesystem writes happen here.
pub fn prepare(collections: &mut Collections, mode: Mode) -> Result<Outcome, PrepareError> {
    let published: Vec<&Post> = collections
        .posts
        .iter()
        .filter(|post| mode.includes_drafts() || post.is_published())
        .collect();

    synthesize(&mut collections.categories, &published, post_categories)?;
    synthesize(&mut collections.tags, &published, post_tags)?;

    recount(&mut collections.categories, &published, post_categories);
    recount(&mut collections.tags, &published, post_tags);

    Ok(Outcome::Persist)
}

fn post_categories(post: &Post) -> &[String] {
    &post.categories
}

fn post_tags(post: &Post) -> &[String] {
    &post.tags
}

/// Append a placeholder record for every name the published posts reference
/// that the collection doesn't declare.
fn synthesize(
    records: &mut Vec<Taxonomy>,
    published: &[&Post],
    names: fn(&Post) -> &[String],
) -> Result<(), PrepareError> {
    let mut referenced: Vec<&str> = Vec::new();
    for post in published {
        for name in names(post) {
            if !referenced.contains(&name.as_str()) {
                referenced.push(name);
            }
        }
    }

    for name in referenced {
        if records.iter().any(|record| record.name == name) {
            continue;
        }

        let slug = slugify(name);
        if slug.is_empty() {
            return Err(PrepareError::EmptySlug {
                name: name.to_string(),
            });
        }

        tracing::debug!("synthesizing taxonomy record for `{name}`");
        records.push(Taxonomy::synthesized(name, slug));
    }

    Ok(())
}

/// Recompute counts and permalinks for every record, declared or
/// synthesized.
fn recount(records: &mut [Taxonomy], published: &[&Post], names: fn(&Post) -> &[String]) {
    for record in records {
        let posts = published
            .iter()
            .filter(|post| names(post).contains(&record.name))
            .count();

        record.count.posts = posts;
        record.count.total = posts;
        record.permalink = format!("/{}", record.slug);
    }
}
