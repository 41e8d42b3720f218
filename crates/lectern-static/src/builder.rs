//! Static site builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{Datelike, Local};
use lectern_content::{to_metadata, ConfigError, Content, ContentLoader, SiteConfig};
use lectern_parsers::{MarkdownExtensions, Metadata, ParserRegistry};
use serde::Serialize;
use serde_json::{json, Value};

use crate::assembler::{Layout, ListPage, PageAssembler};
use crate::assets::AssetPipeline;
use crate::processor::{ItemProcessor, ItemType};
use crate::seo::{PageType, SeoGenerator, Sitemap, SitemapEntry};
use crate::theme::{MinijinjaTheme, Theme};
use crate::urls::{process_static_placeholders, relative_base, resolve_path};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("File not found: {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to load theme: {0}")]
    Template(String),
}

impl BuildError {
    fn io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }
}

/// A navigation entry for a page that this build produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavPage {
    pub filename: &'static str,
    pub label: &'static str,
}

/// Per-page values handed to the page layout.
struct PageMeta<'p> {
    filename: &'p str,
    title: &'p str,
    base_url: &'p str,
    current_page: &'p str,
    page_type: PageType,
    item: Option<&'p Metadata>,
    structured_data: Option<String>,
}

/// State shared by every page write of one build.
struct BuildContext<'b> {
    seo: &'b SeoGenerator<'b>,
    nav: Vec<NavPage>,
    author: Value,
    lastmod: String,
    year: i32,
}

/// Builds a site from a content directory.
pub struct SiteBuilder {
    content_dir: PathBuf,
    config: SiteConfig,
    registry: ParserRegistry,
    theme: Box<dyn Theme>,
    output_dir: PathBuf,
    debug: bool,
}

impl SiteBuilder {
    /// Load the configuration and theme for a content directory.
    pub fn new(content_dir: &Path, theme_override: Option<&str>, debug: bool) -> Result<Self, BuildError> {
        let config = SiteConfig::load(content_dir)?;
        let theme_name = theme_override.unwrap_or(config.theme.as_str());
        let theme = MinijinjaTheme::load(theme_name, content_dir)
            .map_err(|e| BuildError::Template(e.to_string()))?;

        if debug {
            tracing::info!("Using theme '{}'", theme.name());
        }

        Ok(Self::with_theme(content_dir, config, Box::new(theme), debug))
    }

    pub fn with_theme(content_dir: &Path, config: SiteConfig, theme: Box<dyn Theme>, debug: bool) -> Self {
        let registry = ParserRegistry::with_defaults(&config.publications.highlight_author);
        let output_dir = config.output_dir(content_dir);

        Self {
            content_dir: content_dir.to_path_buf(),
            config,
            registry,
            theme,
            output_dir,
            debug,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base URL for generated links: relative in dev mode, else the explicit
    /// value, else the configured site URL.
    pub fn resolve_base_url(&self, base_url: Option<&str>, dev: bool) -> String {
        if dev {
            if self.debug {
                tracing::info!("Development mode: using relative URLs");
            }
            return String::new();
        }
        match base_url {
            Some(url) => {
                if self.debug {
                    tracing::info!("Using explicit base URL: {}", url);
                }
                url.to_string()
            }
            None => {
                if self.debug {
                    tracing::info!("Using site.base_url: {}", self.config.site.base_url);
                }
                self.config.site.base_url.clone()
            }
        }
    }

    /// Build the site into the output directory, replacing its contents.
    pub fn build(&self, base_url: &str) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        tracing::info!("Building site from {}", self.content_dir.display());
        self.prepare_output()?;
        self.copy_static_files()?;
        self.write_assets()?;

        let content =
            ContentLoader::new(&self.content_dir, &self.config, &self.registry).load();

        let seo = SeoGenerator::new(&self.config, &self.config.site.base_url);
        let now = Local::now();
        let context = BuildContext {
            seo: &seo,
            nav: self.navigation(&content),
            author: self.author_context(),
            lastmod: now.format("%Y-%m-%d").to_string(),
            year: now.year(),
        };

        let extensions = MarkdownExtensions::new(&self.config.site.markdown_extensions);
        let processor = ItemProcessor::new(&self.registry, self.theme.as_ref(), extensions, base_url);
        let assembler = PageAssembler::new(&processor, Some(&seo), self.debug);

        let mut sitemap = Sitemap::default();

        let home = assembler.home_page(&self.config, &content.bio, &content.publications);
        sitemap.record(self.write_page(
            &context,
            PageMeta {
                filename: "index.html",
                title: &self.config.site.title,
                base_url,
                current_page: "index.html",
                page_type: PageType::Homepage,
                item: None,
                structured_data: Some(seo.person_schema()).filter(|s| !s.is_empty()),
            },
            &home,
        )?);

        let publications = ListPage {
            title: "Publications",
            filename: "publications.html",
            item_type: ItemType::Publication,
            columns: 1,
            layout: Layout::Grid,
            group_by: Some("year"),
            has_search: true,
        };
        sitemap.record(self.write_list_page(
            &context,
            &assembler,
            &publications,
            PageType::Publications,
            content.publications.clone(),
        )?);

        if !self.config.projects.is_empty() {
            let page = ListPage {
                title: "Projects",
                filename: "projects.html",
                item_type: ItemType::Project,
                columns: 2,
                layout: Layout::Grid,
                group_by: None,
                has_search: false,
            };
            let items = self.config.projects.iter().map(to_metadata).collect();
            sitemap.record(self.write_list_page(&context, &assembler, &page, PageType::Projects, items)?);
        } else {
            tracing::info!("Skipping Projects page (no content provided)");
        }

        if !self.config.talks.is_empty() {
            let page = ListPage {
                title: "Talks",
                filename: "talks.html",
                item_type: ItemType::Talk,
                columns: 1,
                layout: Layout::Grid,
                group_by: None,
                has_search: false,
            };
            let items = self.config.talks.iter().map(to_metadata).collect();
            sitemap.record(self.write_list_page(&context, &assembler, &page, PageType::Talks, items)?);
        } else {
            tracing::info!("Skipping Talks page (no content provided)");
        }

        if !self.config.news.is_empty() {
            let page = ListPage {
                title: "News",
                filename: "news.html",
                item_type: ItemType::News,
                columns: 1,
                layout: Layout::Timeline,
                group_by: None,
                has_search: false,
            };
            let items = self.config.news.iter().map(to_metadata).collect();
            sitemap.record(self.write_list_page(&context, &assembler, &page, PageType::News, items)?);
        } else {
            tracing::info!("Skipping News page (no content provided)");
        }

        if self.config.site.blog_folder().is_none() {
            tracing::info!("Skipping Blog pages (blog disabled in configuration)");
        } else if content.blog_posts.is_empty() {
            tracing::info!("Skipping Blog pages (no content provided)");
        } else {
            let page = ListPage {
                title: "Blog",
                filename: "blog.html",
                item_type: ItemType::BlogPost,
                columns: 2,
                layout: Layout::Grid,
                group_by: None,
                has_search: false,
            };
            let items = content.blog_posts.iter().map(to_metadata).collect();
            sitemap.record(self.write_list_page(&context, &assembler, &page, PageType::Blog, items)?);

            for entry in self.write_blog_posts(&context, &processor, &content, base_url)? {
                sitemap.record(entry);
            }
        }

        for entry in self.write_standalone_pages(&context, &processor, &content, base_url)? {
            sitemap.record(entry);
        }

        if !sitemap.is_empty() {
            let path = self.output_dir.join("sitemap.xml");
            fs::write(&path, seo.sitemap_xml(sitemap.entries())).map_err(|e| BuildError::io(&path, e))?;
            if self.debug {
                tracing::info!("Sitemap written with {} entries", sitemap.len());
            }
        }

        let duration = start.elapsed();
        tracing::info!("Site built in {}", self.output_dir.display());

        Ok(BuildResult {
            pages: sitemap.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.output_dir.clone(),
        })
    }

    fn prepare_output(&self) -> Result<(), BuildError> {
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir).map_err(|e| BuildError::io(&self.output_dir, e))?;
        }
        fs::create_dir_all(&self.output_dir).map_err(|e| BuildError::io(&self.output_dir, e))?;

        let nojekyll = self.output_dir.join(".nojekyll");
        fs::write(&nojekyll, "").map_err(|e| BuildError::io(&nojekyll, e))
    }

    fn copy_static_files(&self) -> Result<(), BuildError> {
        let static_dir = self.config.static_dir(&self.content_dir);
        if !static_dir.is_dir() {
            tracing::debug!("No static directory at {}", static_dir.display());
            return Ok(());
        }

        let target = self.output_dir.join("static");
        let copied = AssetPipeline::copy_dir(&static_dir, &target).map_err(|e| BuildError::io(&static_dir, e))?;
        tracing::info!("Copied {} static files", copied);

        let robots = static_dir.join("robots.txt");
        if robots.is_file() {
            let dest = self.output_dir.join("robots.txt");
            fs::copy(&robots, &dest).map_err(|e| BuildError::io(&dest, e))?;
        }
        Ok(())
    }

    fn write_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.output_dir.join("static");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::io(&assets_dir, e))?;

        let css = AssetPipeline::prepare_css(&self.theme.stylesheet(), self.config.site.minify);
        let css_path = assets_dir.join("style.css");
        fs::write(&css_path, css).map_err(|e| BuildError::io(&css_path, e))?;

        let js_path = assets_dir.join("theme.js");
        fs::write(&js_path, self.theme.script()).map_err(|e| BuildError::io(&js_path, e))
    }

    /// Pages shown in the navigation bar, decided before any page is written.
    fn navigation(&self, content: &Content) -> Vec<NavPage> {
        let mut nav = vec![NavPage {
            filename: "publications.html",
            label: "Publications",
        }];
        if !self.config.projects.is_empty() {
            nav.push(NavPage {
                filename: "projects.html",
                label: "Projects",
            });
        }
        if !self.config.talks.is_empty() {
            nav.push(NavPage {
                filename: "talks.html",
                label: "Talks",
            });
        }
        if !self.config.news.is_empty() {
            nav.push(NavPage {
                filename: "news.html",
                label: "News",
            });
        }
        if !content.blog_posts.is_empty() && self.config.site.blog_folder().is_some() {
            nav.push(NavPage {
                filename: "blog.html",
                label: "Blog",
            });
        }
        nav
    }

    fn author_context(&self) -> Value {
        let mut author = to_metadata(&self.config.author);
        let photo = resolve_path(&self.config.author.photo_path);
        author.insert("photo".into(), json!(photo));
        author.insert(
            "cv_path".into(),
            json!(self.config.author.cv_path.as_deref().map(resolve_path)),
        );
        Value::Object(author)
    }

    fn write_list_page(
        &self,
        context: &BuildContext<'_>,
        assembler: &PageAssembler<'_>,
        page: &ListPage<'_>,
        page_type: PageType,
        items: Vec<Metadata>,
    ) -> Result<SitemapEntry, BuildError> {
        let assembled = assembler.list_page(page, items);
        let base_url = assembled.descriptor.base_url.clone();

        self.write_page(
            context,
            PageMeta {
                filename: page.filename,
                title: page.title,
                base_url: &base_url,
                current_page: page.filename,
                page_type,
                item: None,
                structured_data: assembled.structured_data,
            },
            &assembled.content,
        )
    }

    fn write_blog_posts(
        &self,
        context: &BuildContext<'_>,
        processor: &ItemProcessor<'_>,
        content: &Content,
        base_url: &str,
    ) -> Result<Vec<SitemapEntry>, BuildError> {
        let nested_base = relative_base(base_url, 1);
        let posts = processor.process_entities(&content.blog_posts, ItemType::BlogPost, Some(context.seo));
        let mut entries = Vec::with_capacity(posts.len());

        for mut post in posts {
            let slug = post.get("slug").and_then(Value::as_str).unwrap_or_default().to_string();
            let title = post.get("title").and_then(Value::as_str).unwrap_or_default().to_string();
            let raw = post
                .get("content_raw")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let content_type = post
                .get("content_type")
                .and_then(Value::as_str)
                .unwrap_or("blog_post")
                .to_string();

            let html = processor.render_content(&raw, &content_type);
            post.insert(
                "content".into(),
                json!(process_static_placeholders(&html, &nested_base)),
            );

            let body = processor.theme().render_component(
                "blog_post_page",
                &json!({"item": Value::Object(post.clone()), "base_url": nested_base}),
            );
            let filename = format!("blog/{}.html", slug);
            let structured_data = Some(context.seo.blog_posting_schema(&post)).filter(|s| !s.is_empty());

            entries.push(self.write_page(
                context,
                PageMeta {
                    filename: &filename,
                    title: &title,
                    base_url: &nested_base,
                    current_page: "blog.html",
                    page_type: PageType::BlogPost,
                    item: Some(&post),
                    structured_data,
                },
                &body,
            )?);
        }

        Ok(entries)
    }

    fn write_standalone_pages(
        &self,
        context: &BuildContext<'_>,
        processor: &ItemProcessor<'_>,
        content: &Content,
        base_url: &str,
    ) -> Result<Vec<SitemapEntry>, BuildError> {
        let nested_base = relative_base(base_url, 1);
        let mut entries = Vec::with_capacity(content.pages.len());

        for page in &content.pages {
            let html = processor.render_content(&page.content, &page.content_type);
            let html = process_static_placeholders(&html, &nested_base);

            let body = processor.theme().render_component(
                &page.template_name,
                &json!({
                    "item": {"title": page.title, "slug": page.slug, "content": html},
                    "base_url": nested_base,
                }),
            );
            let filename = format!("pages/{}.html", page.slug);
            let item = to_metadata(page);

            entries.push(self.write_page(
                context,
                PageMeta {
                    filename: &filename,
                    title: &page.title,
                    base_url: &nested_base,
                    current_page: "pages",
                    page_type: PageType::Page,
                    item: Some(&item),
                    structured_data: None,
                },
                &body,
            )?);
        }

        Ok(entries)
    }

    /// Wrap a page body in the layout, write it and return its sitemap record.
    fn write_page(
        &self,
        context: &BuildContext<'_>,
        page: PageMeta<'_>,
        body: &str,
    ) -> Result<SitemapEntry, BuildError> {
        let seo = context.seo;
        let site = &self.config.site;

        let canonical_url = (!site.base_url.is_empty()).then(|| seo.url(page.filename));

        let post_image = match page.page_type {
            PageType::BlogPost => page
                .item
                .and_then(|item| item.get("image"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        };
        let og_image = post_image
            .or(site.seo.custom_og_image.as_deref().filter(|s| !s.is_empty()))
            .or(Some(self.config.author.photo_path.as_str()).filter(|s| !s.is_empty()))
            .map(|path| seo.static_url(path));

        let website_schema = match page.page_type {
            PageType::Homepage if !site.seo.disable_structured_data => seo.website_schema(),
            _ => String::new(),
        };

        let og_type = match page.page_type {
            PageType::BlogPost => "article",
            _ => "website",
        };

        let layout = json!({
            "page_title": page.title,
            "base_url": page.base_url,
            "current_page": page.current_page,
            "built_pages": context.nav,
            "author": context.author,
            "site": site,
            "seo": site.seo,
            "mathjax": self.config.mathjax,
            "meta_description": seo.meta_description(page.page_type, page.item),
            "canonical_url": canonical_url,
            "og_image": og_image,
            "og_type": og_type,
            "structured_data": page.structured_data,
            "website_schema": website_schema,
            "current_year": context.year,
        });

        let html = self.theme.render_page(body, &layout);
        let path = self.output_dir.join(page.filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&path, html).map_err(|e| BuildError::io(&path, e))?;
        tracing::debug!("Wrote {}", path.display());

        Ok(SitemapEntry::for_page(page.filename, Some(context.lastmod.clone())))
    }
}

/// Build a site, logging any failure. Returns whether the build succeeded.
pub fn build_site(
    content_dir: &Path,
    theme_override: Option<&str>,
    debug: bool,
    base_url: Option<&str>,
    dev: bool,
) -> bool {
    let result = SiteBuilder::new(content_dir, theme_override, debug).and_then(|builder| {
        let base_url = builder.resolve_base_url(base_url, dev);
        builder.build(&base_url)
    });

    match result {
        Ok(result) => {
            tracing::info!(
                "Built {} pages in {}ms",
                result.pages,
                result.duration_ms
            );
            true
        }
        Err(BuildError::Config(e)) => {
            tracing::error!("Configuration error: {}", e);
            false
        }
        Err(e @ BuildError::NotFound { .. }) => {
            tracing::error!("{}. Check that all required files exist", e);
            false
        }
        Err(e @ BuildError::PermissionDenied { .. }) => {
            tracing::error!("{}. Check file permissions", e);
            false
        }
        Err(e @ BuildError::Io { .. }) => {
            tracing::error!("Build failed: {}", e);
            false
        }
        Err(e @ BuildError::Template(_)) => {
            tracing::error!("Theme error: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
[author]
name = "Ada Lovelace"
title = "Analyst"
photo_path = "ada.jpg"
interests = ["Computing"]

[site]
title = "Ada Lovelace"
description = "Notes on engines"
base_url = "https://ada.dev"

[publications]
highlight_author = "Lovelace"

[[news]]
date = "2024-01-15"
content = "Joined the *lab*"

[[projects]]
title = "Engine"
description = "An analytical engine"
highlight = true
"#;

    const BIB: &str = r#"
@article{notes1843,
  title = {Sketch of the Analytical Engine},
  author = {Lovelace, Ada and Menabrea, Luigi},
  journal = {Scientific Memoirs},
  year = {1843},
  pdf = {notes.pdf}
}
"#;

    fn write_site(root: &Path) -> PathBuf {
        let content = root.join("content");
        fs::create_dir_all(content.join("blog")).unwrap();
        fs::create_dir_all(content.join("pages")).unwrap();
        fs::create_dir_all(content.join("static").join("images")).unwrap();

        fs::write(content.join("config.toml"), CONFIG).unwrap();
        fs::write(content.join("index.md"), "---\ntagline: Poetical science\n---\nI write about **engines**.").unwrap();
        fs::write(content.join("publications.bib"), BIB).unwrap();
        fs::write(
            content.join("blog").join("hello.md"),
            "---\ntitle: Hello\nslug: hello\ndate: 2024-02-01\nexcerpt: First post\n---\n![fig](images/fig.png)\n\nSee {static}/notes.pdf",
        )
        .unwrap();
        fs::write(content.join("pages").join("cv.md"), "Curriculum *vitae*").unwrap();
        fs::write(content.join("static").join("robots.txt"), "User-agent: *").unwrap();
        fs::write(content.join("static").join("images").join("fig.png"), "png").unwrap();

        content
    }

    fn sitemap_without_lastmod(output: &Path) -> Vec<String> {
        fs::read_to_string(output.join("sitemap.xml"))
            .unwrap()
            .lines()
            .filter(|line| !line.contains("<lastmod>"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn builds_complete_site() {
        let temp = tempdir().unwrap();
        let content = write_site(temp.path());

        assert!(build_site(&content, None, true, None, true));

        let out = temp.path().join("_site");
        for file in [
            "index.html",
            "publications.html",
            "projects.html",
            "news.html",
            "blog.html",
            "blog/hello.html",
            "pages/cv.html",
            "sitemap.xml",
            ".nojekyll",
            "robots.txt",
            "static/style.css",
            "static/theme.js",
            "static/images/fig.png",
        ] {
            assert!(out.join(file).exists(), "missing {}", file);
        }
        assert!(!out.join("talks.html").exists());

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("<strong>engines</strong>"));
        assert!(index.contains("Featured Work"));
        assert!(index.contains("Recent Publications"));
        assert!(index.contains(r#"<span class="highlight">Ada Lovelace</span>"#));
        assert!(index.contains("\"@type\": \"Person\""));
        assert!(index.contains(r#"href="https://ada.dev/index.html""#));

        let post = fs::read_to_string(out.join("blog").join("hello.html")).unwrap();
        assert!(post.contains(r#"src="../static/images/fig.png""#));
        assert!(post.contains("../static/notes.pdf"));
        assert!(post.contains(r#"href="../static/style.css""#));
        assert!(post.contains("BlogPosting"));

        let page = fs::read_to_string(out.join("pages").join("cv.html")).unwrap();
        assert!(page.contains("Curriculum <em>vitae</em>"));
        assert!(page.contains("<title>Cv</title>"));
    }

    #[test]
    fn rebuilding_yields_same_sitemap() {
        let temp = tempdir().unwrap();
        let content = write_site(temp.path());
        let out = temp.path().join("_site");

        assert!(build_site(&content, None, false, None, false));
        let first = sitemap_without_lastmod(&out);
        assert!(build_site(&content, None, false, None, false));
        let second = sitemap_without_lastmod(&out);

        assert_eq!(first, second);
        assert!(first.iter().any(|l| l.contains("<loc>https://ada.dev/blog/hello.html</loc>")));
    }

    #[test]
    fn disabled_blog_is_not_built() {
        let temp = tempdir().unwrap();
        let content = write_site(temp.path());
        let config = format!("{}\n", CONFIG.replace("[site]\n", "[site]\nblog_folder = \"\"\n"));
        fs::write(content.join("config.toml"), config).unwrap();

        let builder = SiteBuilder::new(&content, None, false).unwrap();
        let result = builder.build("").unwrap();

        assert!(!result.output_dir.join("blog.html").exists());
        let index = fs::read_to_string(result.output_dir.join("index.html")).unwrap();
        assert!(!index.contains("blog.html"));
    }

    #[test]
    fn missing_config_fails_build() {
        let temp = tempdir().unwrap();

        assert!(!build_site(temp.path(), None, false, None, false));
        assert!(matches!(
            SiteBuilder::new(temp.path(), None, false),
            Err(BuildError::Config(ConfigError::NotFound(_)))
        ));
    }

    #[test]
    fn explicit_base_url_beats_config_unless_dev() {
        let temp = tempdir().unwrap();
        let content = write_site(temp.path());
        let builder = SiteBuilder::new(&content, None, false).unwrap();

        assert_eq!(builder.resolve_base_url(None, false), "https://ada.dev");
        assert_eq!(builder.resolve_base_url(Some("https://mirror.dev"), false), "https://mirror.dev");
        assert_eq!(builder.resolve_base_url(Some("https://mirror.dev"), true), "");
    }

    #[test]
    fn io_errors_are_categorized() {
        let path = Path::new("x");
        assert!(matches!(
            BuildError::io(path, io::Error::from(io::ErrorKind::NotFound)),
            BuildError::NotFound { .. }
        ));
        assert!(matches!(
            BuildError::io(path, io::Error::from(io::ErrorKind::PermissionDenied)),
            BuildError::PermissionDenied { .. }
        ));
    }
}
