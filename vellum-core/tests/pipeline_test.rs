//! End-to-end pipeline tests over a real content tree.

use serde_json::Value;
use std::fs;
use std::path::Path;
use vellum_core::builder::BuildError;
use vellum_core::{Config, Mode, OutputConfig, Pipeline};

const OPTIONS_YML: &str = r#"name: Example
title: Example Site
description: An example site
keywords:
  - example
author:
  name: Kael
  email: kael@example.com
  url: https://example.com
links:
  - text: Home
    link: /
    type: navigation
socials:
  - name: GitHub
    icon: github
    link: https://github.com/kael
"#;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_site(root: &Path) {
    write(&root.join("options/index.yml"), OPTIONS_YML);
    write(
        &root.join("categories/journal.yml"),
        "name: Journal\nslug: journal\ndescription: Notes\n",
    );
    write(
        &root.join("tags/index.yml"),
        "- name: rust\n  slug: rust\n- name: web\n  slug: web\n",
    );
    write(
        &root.join("pages/about.mdx"),
        "---\ntitle: About\nslug: about\n---\n\nAbout this site.\n",
    );
    write(
        &root.join("posts/hello-world.md"),
        "---\ntitle: Hello World\nslug: hello-world\ndate: 2025-01-15\ntags:\n  - rust\ncover: hello.png\n---\n\n# Hello\n\nFirst post body.\n",
    );
    fs::write(root.join("posts/hello.png"), b"png bytes").unwrap();
}

struct Site {
    _dir: tempfile::TempDir,
    root: std::path::PathBuf,
    data: std::path::PathBuf,
    assets: std::path::PathBuf,
}

impl Site {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("content");
        let data = dir.path().join(".vellum");
        let assets = dir.path().join("public/static");
        write_site(&root);
        Self {
            _dir: dir,
            root,
            data,
            assets,
        }
    }

    fn pipeline(&self, mode: Mode) -> Pipeline {
        let config = Config::new(
            self.root.clone(),
            OutputConfig {
                data: self.data.clone(),
                assets: self.assets.clone(),
                base: "/static/".to_string(),
            },
        );
        Pipeline::new(config, mode)
    }

    fn read(&self, name: &str) -> Value {
        let raw = fs::read_to_string(self.data.join(format!("{name}.json"))).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

#[test]
fn build_writes_typed_collections() {
    let site = Site::new();
    let mut pipeline = site.pipeline(Mode::Production);

    let summary = pipeline.start(true).unwrap().unwrap();
    assert!(summary.is_success());
    assert!(summary.written);
    assert_eq!(summary.records, 6);

    let options = site.read("options");
    assert_eq!(options["name"], "Example");
    assert_eq!(options["author"]["email"], "kael@example.com");
    assert_eq!(options["links"][0]["type"], "navigation");

    let posts = site.read("posts");
    let post = &posts[0];
    assert_eq!(post["permalink"], "/blog/hello-world");
    assert_eq!(post["categories"], serde_json::json!(["Journal"]));
    assert_eq!(post["draft"], false);
    assert!(post["updated"].as_str().unwrap().ends_with('Z'));
    assert_eq!(post["date"], "2025-01-15T00:00:00.000Z");
    assert!(post["content"].as_str().unwrap().contains("<h1>"));
    assert_eq!(post["excerpt"], "First post body.");
    assert_eq!(post["toc"][0]["title"], "Hello");
    assert!(post["metadata"]["word_count"].as_u64().unwrap() > 0);

    let categories = site.read("categories");
    assert_eq!(categories.as_array().unwrap().len(), 1);
    assert_eq!(categories[0]["count"]["posts"], 1);
    assert_eq!(categories[0]["count"]["total"], 1);
    assert_eq!(categories[0]["permalink"], "/journal");

    let tags = site.read("tags");
    let rust = tags
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "rust")
        .unwrap();
    assert_eq!(rust["count"]["posts"], 1);
    let web = tags
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "web")
        .unwrap();
    assert_eq!(web["count"]["posts"], 0);

    let pages = site.read("pages");
    assert_eq!(pages[0]["permalink"], "/about");
    assert!(pages[0]["body"].as_str().unwrap().contains("About this site."));
}

#[test]
fn staged_assets_are_copied_under_hashed_names() {
    let site = Site::new();
    let mut pipeline = site.pipeline(Mode::Production);
    pipeline.start(true).unwrap().unwrap();

    let posts = site.read("posts");
    let cover = posts[0]["cover"].as_str().unwrap();
    assert!(cover.starts_with("/static/hello-"));
    assert!(cover.ends_with(".png"));

    let name = cover.strip_prefix("/static/").unwrap();
    assert!(site.assets.join(name).exists());
}

#[test]
fn duplicate_start_is_ignored() {
    let site = Site::new();
    let mut pipeline = site.pipeline(Mode::Production);

    assert!(pipeline.start(true).unwrap().is_some());
    assert!(pipeline.start(true).unwrap().is_none());
}

#[test]
fn reserved_slug_fails_the_record_and_suppresses_output() {
    let site = Site::new();
    write(
        &site.root.join("pages/about.mdx"),
        "---\ntitle: About\nslug: admin\n---\n\nBody.\n",
    );

    let mut pipeline = site.pipeline(Mode::Production);
    let summary = pipeline.start(true).unwrap().unwrap();

    assert!(!summary.is_success());
    assert!(!summary.written);
    assert!(summary.errors[0].message.contains("reserved"));
    assert!(!site.data.exists());
}

#[test]
fn duplicate_slug_across_global_scope_fails() {
    let site = Site::new();
    // The page reuses the category's slug; both live in the global scope
    write(
        &site.root.join("pages/journal.mdx"),
        "---\ntitle: Journal Page\nslug: journal\n---\n\nBody.\n",
    );

    let mut pipeline = site.pipeline(Mode::Production);
    let summary = pipeline.start(true).unwrap().unwrap();

    assert!(!summary.is_success());
    let error = &summary.errors[0];
    assert_eq!(error.collection, "pages");
    assert!(error.message.contains("duplicate slug"));
}

#[test]
fn missing_options_record_aborts_the_build() {
    let site = Site::new();
    fs::remove_file(site.root.join("options/index.yml")).unwrap();

    let mut pipeline = site.pipeline(Mode::Production);
    let err = pipeline.start(true).unwrap_err();
    assert!(matches!(err, BuildError::Single { collection, .. } if collection == "options"));
}

#[test]
fn authored_updated_value_warns_but_builds() {
    let site = Site::new();
    write(
        &site.root.join("posts/hello-world.md"),
        "---\ntitle: Hello World\nslug: hello-world\ndate: 2025-01-15\nupdated: 2020-01-01\n---\n\nBody.\n",
    );

    let mut pipeline = site.pipeline(Mode::Production);
    let summary = pipeline.start(true).unwrap().unwrap();

    assert!(summary.is_success());
    let warning = summary
        .warnings
        .iter()
        .find(|w| w.field == "updated")
        .unwrap();
    assert!(warning.message.contains("ignored"));

    // The persisted value is the file mtime, not the authored date
    let posts = site.read("posts");
    assert_ne!(posts[0]["updated"], "2020-01-01T00:00:00.000Z");
}

#[test]
fn draft_posts_are_persisted_but_not_aggregated_in_production() {
    let site = Site::new();
    write(
        &site.root.join("posts/secret.md"),
        "---\ntitle: Secret\nslug: secret\ndate: 2025-02-01\ndraft: true\ncategories:\n  - Secret Notes\n---\n\nHidden body.\n",
    );

    let mut pipeline = site.pipeline(Mode::Production);
    pipeline.start(true).unwrap().unwrap();

    let posts = site.read("posts");
    assert_eq!(posts.as_array().unwrap().len(), 2);

    let categories = site.read("categories");
    assert!(categories
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["name"] != "Secret Notes"));
}

#[test]
fn draft_posts_are_aggregated_in_development() {
    let site = Site::new();
    write(
        &site.root.join("posts/secret.md"),
        "---\ntitle: Secret\nslug: secret\ndate: 2025-02-01\ndraft: true\ncategories:\n  - Secret Notes\n---\n\nHidden body.\n",
    );

    let mut pipeline = site.pipeline(Mode::Development);
    pipeline.start(true).unwrap().unwrap();

    let categories = site.read("categories");
    let secret = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Secret Notes")
        .cloned()
        .unwrap();
    assert_eq!(secret["slug"], "secret-notes");
    assert_eq!(secret["count"]["posts"], 1);
    assert_eq!(secret["permalink"], "/secret-notes");
}

#[test]
fn synthesized_category_from_post_reference() {
    let site = Site::new();
    write(
        &site.root.join("posts/second.md"),
        "---\ntitle: Second\nslug: second\ndate: 2025-03-01\ncategories:\n  - NewCat\n---\n\nBody.\n",
    );

    let mut pipeline = site.pipeline(Mode::Production);
    pipeline.start(true).unwrap().unwrap();

    let categories = site.read("categories");
    let newcat = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "NewCat")
        .cloned()
        .unwrap();
    assert_eq!(newcat["slug"], "newcat");
    assert_eq!(newcat["count"]["posts"], 1);
    assert_eq!(newcat["count"]["total"], 1);
    assert_eq!(newcat["permalink"], "/newcat");
}
