//! Slug derivation and scoped uniqueness tracking.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUNS: OnceLock<Regex> = OnceLock::new();
static SLUG_SHAPE: OnceLock<Regex> = OnceLock::new();

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Replace whitespace with hyphens
/// - Remove anything that isn't ASCII alphanumeric or a hyphen
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use vellum_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    // Lowercase the input
    let lowercased = input.to_lowercase();

    // Replace whitespace and underscores with hyphens
    let with_hyphens = lowercased
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect::<String>();

    // Strip everything outside the slug charset
    let cleaned: String = with_hyphens
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    // Collapse multiple hyphens
    let re = HYPHEN_RUNS.get_or_init(|| Regex::new(r"-+").unwrap());
    let collapsed = re.replace_all(&cleaned, "-");

    // Trim hyphens from start and end
    collapsed.trim_matches('-').to_string()
}

/// Check that a slug is lowercase alphanumerics and single hyphens.
pub fn is_well_formed(slug: &str) -> bool {
    SLUG_SHAPE
        .get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap())
        .is_match(slug)
}

/// Namespace a slug's uniqueness is checked against.
///
/// Categories, tags and pages share the `Global` scope; posts have their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlugScope {
    Global,
    Post,
}

impl SlugScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlugScope::Global => "global",
            SlugScope::Post => "post",
        }
    }
}

/// Slugs claimed so far in one build pass.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    global: HashSet<String>,
    post: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a slug within a scope. Returns false if it was already taken.
    pub fn claim(&mut self, scope: SlugScope, slug: &str) -> bool {
        let set = match scope {
            SlugScope::Global => &mut self.global,
            SlugScope::Post => &mut self.post,
        };
        set.insert(slug.to_string())
    }
}
