use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const OPTIONS_YML: &str = r#"name: Example
title: Example Site
keywords:
  - example
author:
  name: Kael
  email: kael@example.com
  url: https://example.com
links: []
socials: []
"#;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_project(dir: &Path) {
    write(
        &dir.join("vellum.yml"),
        "root: content\noutput:\n  data: .vellum\n  assets: public/static\n  base: /static/\n",
    );
    write(&dir.join("content/options/index.yml"), OPTIONS_YML);
    write(
        &dir.join("content/categories/journal.yml"),
        "name: Journal\nslug: journal\n",
    );
    write(&dir.join("content/tags/index.yml"), "- name: rust\n  slug: rust\n");
    write(
        &dir.join("content/pages/about.mdx"),
        "---\ntitle: About\nslug: about\n---\n\nAbout body.\n",
    );
    write(
        &dir.join("content/posts/first.md"),
        "---\ntitle: First\nslug: first\ndate: 2025-01-01\n---\n\nFirst body.\n",
    );
}

#[test]
fn build_writes_data_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path());

    Command::cargo_bin("vellum")?
        .current_dir(dir.path())
        .args(["build"])
        .assert()
        .success();

    let data = dir.path().join(".vellum");
    for name in ["options", "categories", "tags", "pages", "posts"] {
        assert!(data.join(format!("{name}.json")).exists(), "{name}.json");
    }

    let posts: Value = serde_json::from_str(&fs::read_to_string(data.join("posts.json"))?)?;
    assert_eq!(posts[0]["permalink"], "/blog/first");
    assert_eq!(posts[0]["categories"], serde_json::json!(["Journal"]));

    Ok(())
}

#[test]
fn build_fails_on_invalid_record() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_project(dir.path());
    write(
        &dir.path().join("content/pages/admin.mdx"),
        "---\ntitle: Admin\nslug: admin\n---\n\nBody.\n",
    );

    Command::cargo_bin("vellum")?
        .current_dir(dir.path())
        .args(["build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed validation"));

    assert!(!dir.path().join(".vellum").exists());

    Ok(())
}

#[test]
fn build_fails_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    Command::cargo_bin("vellum")?
        .current_dir(dir.path())
        .args(["build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));

    Ok(())
}
