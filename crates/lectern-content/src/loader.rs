//! Content loading.
//!
//! Each content class (bio, publications, blog posts, pages) loads on its
//! own. A failure in one class degrades that class only; a failure in one
//! entry skips that entry only.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use lectern_parsers::{title_case, ContentType, Metadata, ParserRegistry};
use serde_json::Value;

use crate::config::SiteConfig;
use crate::models::{Bio, BlogPost, Page};

/// Everything loaded from the content directory.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub bio: Bio,
    pub publications: Vec<Metadata>,
    pub blog_posts: Vec<BlogPost>,
    pub pages: Vec<Page>,
}

/// Loads content classes through a parser registry.
pub struct ContentLoader<'a> {
    content_dir: PathBuf,
    config: &'a SiteConfig,
    registry: &'a ParserRegistry,
}

impl<'a> ContentLoader<'a> {
    pub fn new(content_dir: impl Into<PathBuf>, config: &'a SiteConfig, registry: &'a ParserRegistry) -> Self {
        Self {
            content_dir: content_dir.into(),
            config,
            registry,
        }
    }

    pub fn load(&self) -> Content {
        let content = Content {
            bio: self.load_bio(),
            publications: self.load_publications(),
            blog_posts: self.load_blog_posts(),
            pages: self.load_pages(),
        };

        tracing::info!(
            "Loaded {} publications, {} blog posts, {} pages",
            content.publications.len(),
            content.blog_posts.len(),
            content.pages.len()
        );
        content
    }

    /// Bio from `index.md`, falling back to the configured author.
    pub fn load_bio(&self) -> Bio {
        let index = self.content_dir.join("index.md");
        if !index.is_file() {
            tracing::debug!("No index.md, using author config for bio");
            return self.author_bio();
        }

        let Some(parser) = self.registry.parser_for_file(&index) else {
            tracing::warn!("No parser found for {}, using author config for bio", index.display());
            return self.author_bio();
        };

        let raw = match parser.parse_file(&index) {
            Ok(records) => records.into_iter().next(),
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", index.display(), e);
                None
            }
        };
        let Some(raw) = raw else {
            return self.author_bio();
        };

        let mut metadata = raw.metadata;
        metadata.insert("bio".to_string(), Value::String(raw.content));

        match serde_json::from_value::<Bio>(Value::Object(metadata)) {
            Ok(mut bio) => {
                let author = &self.config.author;
                if !author.interests.is_empty() {
                    bio.interests = author.interests.clone();
                }
                if bio.title.is_empty() {
                    bio.title = author.title.clone();
                }
                if bio.affiliation.is_empty() {
                    bio.affiliation = author.affiliation.clone();
                }
                if bio.tagline.is_empty() {
                    bio.tagline = author.tagline.clone();
                }
                bio
            }
            Err(e) => {
                tracing::warn!("Invalid bio in {}: {}", index.display(), e);
                self.author_bio()
            }
        }
    }

    fn author_bio(&self) -> Bio {
        let author = &self.config.author;
        Bio {
            bio: String::new(),
            tagline: author.tagline.clone(),
            interests: author.interests.clone(),
            title: author.title.clone(),
            affiliation: author.affiliation.clone(),
        }
    }

    /// Resolved bibliography path (absolute, or relative to the content directory).
    pub fn bib_path(&self) -> PathBuf {
        let configured = Path::new(&self.config.publications.bib_path);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.content_dir.join(configured)
        }
    }

    /// Publications, newest first.
    pub fn load_publications(&self) -> Vec<Metadata> {
        let path = self.bib_path();
        if !path.is_file() {
            tracing::warn!("Bibliography not found at {}, no publications", path.display());
            return Vec::new();
        }

        let Some(parser) = self.registry.parser_for_file(&path) else {
            tracing::warn!("No parser found for {}", path.display());
            return Vec::new();
        };

        match parser.parse_file(&path) {
            Ok(records) => records.into_iter().map(|raw| raw.metadata).collect(),
            Err(e) => {
                tracing::warn!("Failed to load publications: {}", e);
                Vec::new()
            }
        }
    }

    /// Blog posts from every parser that can produce them.
    ///
    /// Results are merged in registration order and deduplicated by slug,
    /// keeping the first occurrence.
    pub fn load_blog_posts(&self) -> Vec<BlogPost> {
        let Some(folder) = self.config.site.blog_folder() else {
            tracing::debug!("Blog disabled");
            return Vec::new();
        };

        let blog_dir = self.content_dir.join(folder);
        if !blog_dir.is_dir() {
            tracing::debug!("No blog directory at {}", blog_dir.display());
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for parser in self.registry.parsers_for_content_type(ContentType::BlogPost) {
            for raw in parser.parse_directory(&blog_dir, Some(ContentType::BlogPost)) {
                let slug = raw.meta_str("slug").unwrap_or_default().to_string();
                if slug.is_empty() || !seen.insert(slug.clone()) {
                    tracing::debug!("Skipping duplicate blog post '{}' from {}", slug, parser.name());
                    continue;
                }

                match BlogPost::from_metadata(raw.into_flat()) {
                    Ok(post) => posts.push(post),
                    Err(e) => tracing::warn!("Skipping blog post '{}': {}", slug, e),
                }
            }
        }

        posts
    }

    /// Standalone pages from the flat `pages/` directory.
    pub fn load_pages(&self) -> Vec<Page> {
        let pages_dir = self.content_dir.join("pages");
        let entries = match fs::read_dir(&pages_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();

        let mut pages = Vec::new();
        for path in paths {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if !path.is_file() || name.starts_with('_') || name.starts_with('.') {
                continue;
            }

            let Some(parser) = self.registry.parser_for_file(&path) else {
                tracing::warn!("No parser found for {}", path.display());
                continue;
            };

            let raw = match parser.parse_file(&path) {
                Ok(records) => records.into_iter().next(),
                Err(e) => {
                    tracing::warn!("Skipping page {}: {}", path.display(), e);
                    continue;
                }
            };
            let Some(raw) = raw else {
                continue;
            };

            let mut page = raw.into_flat();
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if page.get("slug").and_then(Value::as_str).map_or(true, str::is_empty) {
                page.insert("slug".to_string(), stem.into());
            }
            if page.get("title").and_then(Value::as_str).map_or(true, str::is_empty) {
                let base = page.get("slug").and_then(Value::as_str).unwrap_or(stem);
                let title = title_case(&base.replace('-', " "));
                page.insert("title".to_string(), title.into());
            }

            match Page::from_metadata(page) {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Skipping page {}: {}", path.display(), e),
            }
        }

        pages
    }
}
