//! SEO metadata: JSON-LD schemas, meta descriptions and the sitemap.
//!
//! Everything here is a pure function of the site configuration and the
//! processed item it is given.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lectern_content::SiteConfig;
use lectern_parsers::Metadata;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::urls::{build_url, is_external_url};

const SCHEMA_CONTEXT: &str = "https://schema.org";
const EXCERPT_LIMIT: usize = 155;

/// Page kinds with their own meta description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    Homepage,
    Publications,
    Publication,
    Projects,
    Talks,
    News,
    Blog,
    BlogPost,
    Page,
}

/// Generates schemas and descriptions for one site configuration.
#[derive(Debug)]
pub struct SeoGenerator<'a> {
    config: &'a SiteConfig,
    base_url: String,
}

impl<'a> SeoGenerator<'a> {
    /// `base_url` should be the configured production URL; empty keeps URLs relative.
    pub fn new(config: &'a SiteConfig, base_url: &str) -> Self {
        Self {
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        build_url(&self.base_url, path)
    }

    /// URL of a file in the static directory; external URLs pass through.
    pub fn static_url(&self, path: &str) -> String {
        if is_external_url(path) {
            path.to_string()
        } else {
            self.url(&format!("static/{}", path.trim_start_matches("static/")))
        }
    }

    fn structured_data_disabled(&self) -> bool {
        self.config.site.seo.disable_structured_data
    }

    fn author_person(&self) -> Value {
        json!({"@type": "Person", "name": self.config.author.name})
    }

    /// Person schema for the homepage.
    pub fn person_schema(&self) -> String {
        if self.structured_data_disabled() {
            return String::new();
        }

        let author = &self.config.author;
        let seo = &self.config.site.seo;

        let mut schema = schema_base("Person");
        schema.insert("name".into(), json!(author.name));
        schema.insert("url".into(), json!(self.base_url));
        schema.insert("jobTitle".into(), json!(author.title));
        schema.insert("description".into(), json!(self.config.site.description));

        if !author.photo_path.is_empty() {
            schema.insert("image".into(), json!(self.static_url(&author.photo_path)));
        }
        if !author.affiliation.is_empty() {
            schema.insert("affiliation".into(), organization(&author.affiliation));
        }

        let same_as: Vec<&str> = author.social_links().into_iter().map(|(_, url)| url).collect();
        if !same_as.is_empty() {
            schema.insert("sameAs".into(), json!(same_as));
        }
        if !author.email.is_empty() {
            schema.insert("email".into(), json!(author.email));
        }

        let knowledge = seo
            .custom_knowledge_areas
            .as_ref()
            .filter(|areas| !areas.is_empty())
            .unwrap_or(&author.interests);
        if !knowledge.is_empty() {
            schema.insert("knowsAbout".into(), json!(knowledge));
        }

        if !author.affiliation.is_empty() {
            schema.insert("worksFor".into(), organization(&author.affiliation));
        }
        if let Some(alumni) = seo.alumni_of.as_deref().filter(|s| !s.is_empty()) {
            schema.insert(
                "alumniOf".into(),
                json!({"@type": "EducationalOrganization", "name": alumni}),
            );
        }

        to_json(schema)
    }

    /// ScholarlyArticle schema for a processed publication.
    pub fn scholarly_article_schema(&self, publication: &Metadata) -> String {
        let title = text(publication, "title").unwrap_or_default();

        let mut schema = schema_base("ScholarlyArticle");
        schema.insert("headline".into(), json!(title));
        schema.insert("name".into(), json!(title));

        if let Some(Value::Array(authors)) = publication.get("authors") {
            let people: Vec<Value> = authors
                .iter()
                .filter_map(Value::as_str)
                .map(|name| json!({"@type": "Person", "name": name}))
                .collect();
            if !people.is_empty() {
                schema.insert("author".into(), Value::Array(people));
            }
        }

        if let Some(year) = publication.get("year").and_then(|v| normalize_date(v, true)) {
            schema.insert("datePublished".into(), json!(year));
        }
        if let Some(venue) = text(publication, "venue") {
            schema.insert("publisher".into(), organization(venue));
        }
        if let Some(abstract_text) = raw_text(publication, "abstract") {
            schema.insert("abstract".into(), json!(abstract_text));
        }

        let pdf = publication
            .get("links")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|link| {
                link.get("label")
                    .and_then(Value::as_str)
                    .is_some_and(|label| label.contains("PDF"))
            })
            .and_then(|link| link.get("url").and_then(Value::as_str));
        if let Some(url) = pdf {
            schema.insert("url".into(), json!(url));
        }

        to_json(schema)
    }

    /// SoftwareApplication schema for a processed project.
    pub fn software_application_schema(&self, project: &Metadata) -> String {
        let mut schema = schema_base("SoftwareApplication");
        schema.insert("name".into(), json!(text(project, "title").unwrap_or_default()));
        schema.insert(
            "description".into(),
            json!(raw_text(project, "description").unwrap_or_default()),
        );
        schema.insert("applicationCategory".into(), json!("DeveloperApplication"));

        if let Some(repo) = text(project, "github").or_else(|| text(project, "code")) {
            schema.insert("codeRepository".into(), json!(repo));
        }
        if let Some(url) = text(project, "website") {
            schema.insert("url".into(), json!(url));
        }
        schema.insert("author".into(), self.author_person());

        to_json(schema)
    }

    /// BlogPosting schema for a blog post.
    pub fn blog_posting_schema(&self, post: &Metadata) -> String {
        if self.structured_data_disabled() {
            return String::new();
        }

        let seo = &self.config.site.seo;

        let mut schema = schema_base("BlogPosting");
        schema.insert("headline".into(), json!(text(post, "title").unwrap_or_default()));
        schema.insert("author".into(), self.author_person());

        if let Some(date) = post.get("date").and_then(|v| normalize_date(v, false)) {
            schema.insert("datePublished".into(), json!(date));
        }
        if let Some(excerpt) = raw_text(post, "excerpt") {
            schema.insert("description".into(), json!(excerpt));
        }
        if let Some(slug) = text(post, "slug") {
            let url = self.url(&format!("blog/{}.html", slug));
            schema.insert("url".into(), json!(url));
            schema.insert(
                "mainEntityOfPage".into(),
                json!({"@type": "WebPage", "@id": url}),
            );
        }

        let publisher_name = seo
            .custom_publisher_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.config.author.name);
        let logo_url = seo
            .custom_publisher_logo
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.config.author.photo_path.as_str()).filter(|s| !s.is_empty()))
            .map(|path| self.static_url(path));

        let mut publisher = organization(publisher_name);
        if let (Some(url), Value::Object(map)) = (&logo_url, &mut publisher) {
            map.insert("logo".into(), json!({"@type": "ImageObject", "url": url}));
        }
        schema.insert("publisher".into(), publisher);

        if let Some(image) = text(post, "image") {
            schema.insert("image".into(), json!(self.static_url(image)));
        } else if let Some(url) = logo_url {
            schema.insert("image".into(), json!(url));
        }

        to_json(schema)
    }

    /// Website schema for the whole site.
    pub fn website_schema(&self) -> String {
        let mut schema = schema_base("Website");
        schema.insert("name".into(), json!(self.config.site.title));
        schema.insert("description".into(), json!(self.config.site.description));
        schema.insert("url".into(), json!(self.base_url));
        schema.insert("author".into(), self.author_person());
        to_json(schema)
    }

    pub fn meta_description(&self, page_type: PageType, item: Option<&Metadata>) -> String {
        let name = &self.config.author.name;
        let interests = self
            .config
            .author
            .interests
            .iter()
            .take(3)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        match (page_type, item) {
            (PageType::Publications, _) => format!(
                "Research publications by {}, covering {} and more.",
                name, interests
            ),
            (PageType::Blog, _) => {
                format!("Insights and thoughts on {} by {}.", interests, name)
            }
            (PageType::BlogPost, Some(post)) => match raw_text(post, "excerpt") {
                Some(excerpt) => truncate_excerpt(&strip_tags(excerpt)),
                None => format!(
                    "A blog post by {} about {}.",
                    name,
                    text(post, "title").unwrap_or("research and development")
                ),
            },
            (PageType::Publication, Some(publication)) => format!(
                "A {} publication by {} et al. in {}, titled '{}'.",
                publication
                    .get("year")
                    .and_then(|v| normalize_date(v, true))
                    .unwrap_or_else(|| "recent".to_string()),
                name,
                text(publication, "venue").unwrap_or("a leading journal"),
                text(publication, "title").unwrap_or_default()
            ),
            (PageType::Projects, _) => format!(
                "Research projects and open-source contributions by {} in {}.",
                name, interests
            ),
            (PageType::Talks, _) => format!(
                "Conference talks and presentations by {} on {}.",
                name, interests
            ),
            (PageType::News, _) => format!(
                "Latest news and updates from {}'s research and academic activities.",
                name
            ),
            _ => self.config.site.description.clone(),
        }
    }

    /// Render the sitemap for the recorded pages.
    pub fn sitemap_xml(&self, entries: &[SitemapEntry]) -> String {
        let urls: Vec<String> = entries
            .iter()
            .map(|entry| {
                let mut url = format!(
                    "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>",
                    escape_xml(&self.url(&entry.path)),
                    entry.changefreq,
                    entry.priority
                );
                if let Some(lastmod) = &entry.lastmod {
                    url.push_str(&format!("\n    <lastmod>{}</lastmod>", lastmod));
                }
                url.push_str("\n  </url>");
                url
            })
            .collect();

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>\n",
            urls.join("\n")
        )
    }
}

/// One written page, as recorded for the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub path: String,
    pub priority: &'static str,
    pub changefreq: &'static str,
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    pub fn for_page(path: &str, lastmod: Option<String>) -> Self {
        let priority = match path {
            "index.html" => "1.0",
            "publications.html" | "projects.html" => "0.8",
            _ => "0.6",
        };
        let changefreq = if path == "index.html" { "weekly" } else { "monthly" };

        Self {
            path: path.to_string(),
            priority,
            changefreq,
            lastmod,
        }
    }
}

/// Sitemap records accumulated over a build, unique by path.
#[derive(Debug, Default, Clone)]
pub struct Sitemap {
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Add an entry unless its path is already recorded.
    pub fn record(&mut self, entry: SitemapEntry) -> bool {
        if self.entries.iter().any(|e| e.path == entry.path) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a date-like value to `YYYY` (when `year_only`) or `YYYY-MM-DD`.
///
/// Unrecognized strings are kept as written.
pub fn normalize_date(value: &Value, year_only: bool) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    let format = if year_only { "%Y" } else { "%Y-%m-%d" };
    let parsed = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        });

    Some(match parsed {
        Some(date) => date.format(format).to_string(),
        None => raw,
    })
}

fn schema_base(kind: &str) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("@context".into(), json!(SCHEMA_CONTEXT));
    schema.insert("@type".into(), json!(kind));
    schema
}

fn organization(name: &str) -> Value {
    json!({"@type": "Organization", "name": name})
}

fn to_json(schema: Map<String, Value>) -> String {
    serde_json::to_string_pretty(&Value::Object(schema)).unwrap_or_default()
}

fn text<'m>(item: &'m Metadata, key: &str) -> Option<&'m str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// The source text of a field, before markdown rendering.
fn raw_text<'m>(item: &'m Metadata, key: &str) -> Option<&'m str> {
    item.get("_raw")
        .and_then(|raw| raw.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| text(item, key))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^<]+?>").expect("valid regex"))
}

fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").trim().to_string()
}

fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_LIMIT {
        let cut: String = text.chars().take(EXCERPT_LIMIT).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> SiteConfig {
        SiteConfig::from_toml(
            r#"
[author]
name = "Ada Lovelace"
title = "Analyst"
affiliation = "Analytical Society"
photo_path = "ada.jpg"
interests = ["Computing", "Poetry", "Mathematics", "Engines"]
github = "https://github.com/ada"

[site]
title = "Ada"
description = "Notes on engines"
"#,
        )
        .unwrap()
    }

    fn map(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn parse(schema: &str) -> Value {
        serde_json::from_str(schema).unwrap()
    }

    #[test]
    fn person_schema_includes_configured_fields() {
        let config = config();
        let seo = SeoGenerator::new(&config, "https://ada.dev/");

        let schema = parse(&seo.person_schema());

        assert_eq!(schema["@type"], "Person");
        assert_eq!(schema["url"], "https://ada.dev");
        assert_eq!(schema["image"], "https://ada.dev/static/ada.jpg");
        assert_eq!(schema["worksFor"]["name"], "Analytical Society");
        assert_eq!(schema["sameAs"], json!(["https://github.com/ada"]));
        assert_eq!(schema["knowsAbout"][0], "Computing");
        assert!(schema.get("email").is_none());
        assert!(schema.get("alumniOf").is_none());
    }

    #[test]
    fn disabled_structured_data_suppresses_person_and_posting() {
        let mut config = config();
        config.site.seo.disable_structured_data = true;
        let seo = SeoGenerator::new(&config, "");

        assert_eq!(seo.person_schema(), "");
        assert_eq!(seo.blog_posting_schema(&map(json!({"title": "x"}))), "");
    }

    #[test]
    fn scholarly_article_maps_publication_fields() {
        let config = config();
        let seo = SeoGenerator::new(&config, "");
        let publication = map(json!({
            "title": "Notes",
            "year": 1843,
            "venue": "Taylor's Scientific Memoirs",
            "authors": ["Ada Lovelace"],
            "links": [{"label": "Paper", "url": "https://doi.org/x"}, {"label": "PDF", "url": "notes.pdf"}],
        }));

        let schema = parse(&seo.scholarly_article_schema(&publication));

        assert_eq!(schema["datePublished"], "1843");
        assert_eq!(schema["author"][0]["name"], "Ada Lovelace");
        assert_eq!(schema["publisher"]["name"], "Taylor's Scientific Memoirs");
        assert_eq!(schema["url"], "notes.pdf");
    }

    #[test]
    fn blog_posting_falls_back_to_author_photo() {
        let config = config();
        let seo = SeoGenerator::new(&config, "https://ada.dev");
        let post = map(json!({
            "title": "Engines",
            "slug": "engines",
            "date": "2024-03-01T10:00:00Z",
            "excerpt": "<p>About engines</p>",
            "_raw": {"excerpt": "About engines"},
        }));

        let schema = parse(&seo.blog_posting_schema(&post));

        assert_eq!(schema["datePublished"], "2024-03-01");
        assert_eq!(schema["description"], "About engines");
        assert_eq!(schema["url"], "https://ada.dev/blog/engines.html");
        assert_eq!(schema["publisher"]["logo"]["url"], "https://ada.dev/static/ada.jpg");
        assert_eq!(schema["image"], "https://ada.dev/static/ada.jpg");
    }

    #[test]
    fn meta_descriptions_per_page_type() {
        let config = config();
        let seo = SeoGenerator::new(&config, "");

        assert_eq!(seo.meta_description(PageType::Homepage, None), "Notes on engines");
        assert_eq!(
            seo.meta_description(PageType::Publications, None),
            "Research publications by Ada Lovelace, covering Computing, Poetry, Mathematics and more."
        );
        assert_eq!(
            seo.meta_description(PageType::BlogPost, Some(&map(json!({"title": "Engines"})))),
            "A blog post by Ada Lovelace about Engines."
        );
    }

    #[test]
    fn blog_post_description_is_stripped_and_capped() {
        let config = config();
        let seo = SeoGenerator::new(&config, "");
        let excerpt = format!("<p>{}</p>", "word ".repeat(60));

        let description =
            seo.meta_description(PageType::BlogPost, Some(&map(json!({"excerpt": excerpt}))));

        assert!(!description.contains('<'));
        assert!(description.ends_with("..."));
        assert_eq!(description.chars().count(), EXCERPT_LIMIT + 3);
    }

    #[test]
    fn sitemap_omits_missing_lastmod() {
        let config = config();
        let seo = SeoGenerator::new(&config, "https://ada.dev");
        let entries = vec![
            SitemapEntry::for_page("index.html", Some("2024-01-01".to_string())),
            SitemapEntry::for_page("blog/a.html", None),
        ];

        let xml = seo.sitemap_xml(&entries);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://ada.dev/index.html</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert_eq!(xml.matches("<lastmod>").count(), 1);
        assert_eq!(xml.matches("<url>").count(), 2);
    }

    #[test]
    fn sitemap_records_each_path_once() {
        let mut sitemap = Sitemap::default();

        assert!(sitemap.record(SitemapEntry::for_page("publications.html", None)));
        assert!(!sitemap.record(SitemapEntry::for_page("publications.html", None)));

        assert_eq!(sitemap.len(), 1);
        assert_eq!(sitemap.entries()[0].priority, "0.8");
    }

    #[test]
    fn normalizes_dates() {
        assert_eq!(normalize_date(&json!("2023-05-17"), true).as_deref(), Some("2023"));
        assert_eq!(normalize_date(&json!(2021), true).as_deref(), Some("2021"));
        assert_eq!(normalize_date(&json!("Spring 2020"), false).as_deref(), Some("Spring 2020"));
        assert_eq!(normalize_date(&json!(""), false), None);
    }
}
