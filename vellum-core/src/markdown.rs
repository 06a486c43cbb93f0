//! Markdown rendering and content-derived metadata.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

const EXCERPT_LIMIT: usize = 260;
const WORDS_PER_MINUTE: usize = 200;

/// One table-of-contents entry, flattened in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub title: String,
    pub anchor: String,
}

/// Word count and estimated reading time derived from the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    pub word_count: usize,
    pub reading_time: usize,
}

/// Rendered body plus everything derived from it in one pass.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub excerpt: String,
    pub meta: ContentMeta,
}

/// Markdown renderer shared by all collections in a build.
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }

    /// Convert a markdown body to HTML along with its derived fields.
    pub fn render(&self, markdown: &str) -> Rendered {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, self.options).collect();

        let toc = collect_headings(&events);
        let excerpt = first_paragraph(&events);

        let plain = plain_text(&events);
        let word_count = plain.unicode_words().count();
        let meta = ContentMeta {
            word_count,
            reading_time: reading_time(word_count),
        };

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Rendered {
            html: html_output,
            toc,
            excerpt,
            meta,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn reading_time(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Collect headings for the TOC, anchored by their slugified title
fn collect_headings(events: &[Event]) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    let anchor = crate::slug::slugify(&title);
                    toc.push(TocEntry {
                        level,
                        title,
                        anchor,
                    });
                }
            }
            _ => {}
        }
    }

    toc
}

/// Plain text of the first non-empty paragraph, capped at the excerpt limit
fn first_paragraph(events: &[Event]) -> String {
    let mut in_paragraph = false;
    let mut out = String::new();

    for event in events {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) => {
                if !out.trim().is_empty() {
                    break;
                }
                in_paragraph = false;
                out.clear();
            }
            Event::Text(text) | Event::Code(text) if in_paragraph => out.push_str(text),
            Event::SoftBreak | Event::HardBreak if in_paragraph => out.push(' '),
            _ => {}
        }
    }

    let trimmed = out.trim();
    if trimmed.chars().count() <= EXCERPT_LIMIT {
        trimmed.to_string()
    } else {
        trimmed.chars().take(EXCERPT_LIMIT).collect()
    }
}

fn plain_text(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            Event::Text(text) | Event::Code(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out
}
