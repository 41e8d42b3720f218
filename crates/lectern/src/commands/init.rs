//! Scaffold a starter content directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub fn run(dir: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing lectern site in {}...", dir.display());

    if dir.join("config.toml").exists() && !yes {
        tracing::warn!("{} already contains config.toml. Use --yes to overwrite.", dir.display());
        return Ok(());
    }

    for sub in ["blog", "pages", "static/images"] {
        let path = dir.join(sub);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }

    let files = [
        ("config.toml", DEFAULT_CONFIG),
        ("index.md", DEFAULT_INDEX),
        ("publications.bib", DEFAULT_BIB),
        ("blog/hello-world.md", DEFAULT_POST),
        ("pages/teaching.md", DEFAULT_PAGE),
        ("static/robots.txt", DEFAULT_ROBOTS),
    ];

    for (name, source) in files {
        let path = dir.join(name);
        if path.exists() && !yes {
            continue;
        }
        fs::write(&path, source).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'lectern build {} --dev' to build a local preview.", dir.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"theme = "minimal"

[author]
name = "Your Name"
title = "PhD Student"
affiliation = "Your University"
email = "you@example.edu"
interests = ["Machine Learning", "Systems"]
github = "https://github.com/you"
photo_path = "images/profile.jpg"

[[author.homepage_buttons]]
text = "Publications"
url = "publications.html"
style = "primary"

[site]
title = "Your Name"
description = "Personal academic website"
base_url = ""
homepage_publications_count = 5
homepage_news_count = 5

[publications]
bib_path = "publications.bib"
highlight_author = ["Your Name"]

[mathjax]
enabled = false

[[news]]
date = "2024-01-01"
content = "Launched my new website."
"#;

const DEFAULT_INDEX: &str = r#"---
tagline: Researcher and builder
---

Write a short introduction about yourself here. Markdown is supported.
"#;

const DEFAULT_BIB: &str = r#"@inproceedings{name2024example,
  title = {An Example Paper},
  author = {Name, Your and Collaborator, Some},
  booktitle = {Proceedings of an Example Conference},
  year = {2024},
  pdf = {https://example.org/paper.pdf},
  highlight = {true}
}
"#;

const DEFAULT_POST: &str = r#"---
title: Hello World
date: 2024-01-01
excerpt: The first post on this site.
tags: [meta]
---

This is the first post. Files in `static/` are reachable with `{static}/...`.
"#;

const DEFAULT_PAGE: &str = r#"---
title: Teaching
---

List your courses here.
"#;

const DEFAULT_ROBOTS: &str = "User-agent: *\nAllow: /\n";

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_content_directory() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("content");

        run(&dir, false).unwrap();

        for name in ["config.toml", "index.md", "publications.bib", "blog/hello-world.md", "pages/teaching.md"] {
            assert!(dir.join(name).is_file(), "missing {}", name);
        }
        assert!(dir.join("static").join("images").is_dir());
    }

    #[test]
    fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("config.toml"), "theme = \"custom\"").unwrap();

        run(temp.path(), false).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("config.toml")).unwrap(),
            "theme = \"custom\""
        );
        assert!(!temp.path().join("index.md").exists());
    }

    #[test]
    fn scaffold_builds() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("content");
        run(&dir, false).unwrap();

        assert!(lectern_static::build_site(&dir, None, false, None, true));
        assert!(temp.path().join("_site").join("index.html").is_file());
        assert!(temp.path().join("_site").join("blog").join("hello-world.html").is_file());
    }
}
