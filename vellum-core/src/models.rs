//! Typed records produced by the collection pipeline.

use crate::markdown::{ContentMeta, TocEntry};
use serde::{Deserialize, Serialize};

/// Icon set supported by social entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialIcon {
    Github,
    Instagram,
    Medium,
    Twitter,
    Youtube,
}

/// Where a site link is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Navigation,
    Footer,
    Copyright,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteLink {
    pub text: String,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Social {
    pub name: String,
    pub icon: SocialIcon,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Singleton site metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub author: Author,
    pub links: Vec<SiteLink>,
    pub socials: Vec<Social>,
}

/// Aggregate usage counters on taxonomy records.
///
/// `total` mirrors `posts` for now; it is the slot other content kinds
/// would add into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub total: usize,
    pub posts: usize,
}

/// A category or tag record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub count: Count,
    #[serde(default)]
    pub permalink: String,
}

impl Taxonomy {
    /// Record synthesized for a name referenced only by content.
    ///
    /// Counts and permalink are placeholders until the aggregation pass
    /// recomputes them.
    pub fn synthesized(name: &str, slug: String) -> Self {
        Self {
            name: name.to_string(),
            slug,
            cover: None,
            description: None,
            count: Count::default(),
            permalink: String::new(),
        }
    }
}

/// A standalone page with a rendered body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    pub body: String,
    #[serde(default)]
    pub permalink: String,
}

/// Optional per-post metadata overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// A blog post record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub slug: String,
    pub date: String,
    /// Resolved from the source file's modification time, never authored.
    pub updated: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub toc: Vec<TocEntry>,
    pub metadata: ContentMeta,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub permalink: String,
}

impl Post {
    /// Whether the post belongs to the published subset of a production
    /// build.
    pub fn is_published(&self) -> bool {
        !self.draft
    }
}

/// The fully built set of collections handed to the prepare step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collections {
    pub options: Options,
    pub categories: Vec<Taxonomy>,
    pub tags: Vec<Taxonomy>,
    pub pages: Vec<Page>,
    pub posts: Vec<Post>,
}
