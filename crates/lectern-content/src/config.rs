//! Site configuration (`config.toml`).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{HomepageButton, NewsItem, ProjectItem, ServiceItem, TalkItem};

pub const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur while loading the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Root of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_static_path")]
    pub static_path: String,
    #[serde(default)]
    pub author: AuthorConfig,
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub publications: PublicationsConfig,
    #[serde(default)]
    pub mathjax: MathJaxConfig,
    #[serde(default, deserialize_with = "lenient_items")]
    pub news: Vec<NewsItem>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub projects: Vec<ProjectItem>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub talks: Vec<TalkItem>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            output_path: default_output_path(),
            static_path: default_static_path(),
            author: AuthorConfig::default(),
            site: SiteSettings::default(),
            publications: PublicationsConfig::default(),
            mathjax: MathJaxConfig::default(),
            news: Vec::new(),
            projects: Vec::new(),
            talks: Vec::new(),
        }
    }
}

fn default_theme() -> String {
    "minimal".to_string()
}
fn default_output_path() -> String {
    "_site".to_string()
}
fn default_static_path() -> String {
    "static".to_string()
}

impl SiteConfig {
    /// Load `config.toml` from a content directory.
    pub fn load(content_dir: &Path) -> Result<Self, ConfigError> {
        let path = content_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let source = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&source).map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(source: &str) -> Result<Self, String> {
        toml::from_str(source).map_err(|e| e.to_string())
    }

    /// Output directory, relative to the content directory's parent unless absolute.
    pub fn output_dir(&self, content_dir: &Path) -> PathBuf {
        let output = Path::new(&self.output_path);
        if output.is_absolute() {
            return output.to_path_buf();
        }
        content_dir
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(output)
    }

    pub fn static_dir(&self, content_dir: &Path) -> PathBuf {
        content_dir.join(&self.static_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub title: String,
    pub affiliation: String,
    pub email: String,
    pub tagline: String,
    pub interests: Vec<String>,
    pub github: String,
    pub scholar: String,
    pub linkedin: String,
    pub twitter: String,
    pub photo_path: String,
    pub cv_path: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub homepage_buttons: Vec<HomepageButton>,
    #[serde(deserialize_with = "lenient_items")]
    pub service: Vec<ServiceItem>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            title: "Your Title".to_string(),
            affiliation: "Your Institution".to_string(),
            email: String::new(),
            tagline: String::new(),
            interests: Vec::new(),
            github: String::new(),
            scholar: String::new(),
            linkedin: String::new(),
            twitter: String::new(),
            photo_path: "profile.jpg".to_string(),
            cv_path: None,
            homepage_buttons: Vec::new(),
            service: Vec::new(),
        }
    }
}

impl AuthorConfig {
    /// Social profile links that are set, in display order.
    pub fn social_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("github", self.github.as_str()),
            ("scholar", self.scholar.as_str()),
            ("linkedin", self.linkedin.as_str()),
            ("twitter", self.twitter.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.trim().is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    pub base_url: String,
    pub markdown_extensions: Vec<String>,
    pub blog_folder: Option<String>,
    pub homepage_publications_count: HomepageCount,
    pub homepage_news_count: HomepageCount,
    pub minify: bool,
    pub seo: SeoConfig,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Your Name - Your Title".to_string(),
            description: String::new(),
            base_url: String::new(),
            markdown_extensions: vec![
                "tables".to_string(),
                "footnotes".to_string(),
                "strikethrough".to_string(),
                "tasklists".to_string(),
            ],
            blog_folder: Some("blog".to_string()),
            homepage_publications_count: HomepageCount::Count(3),
            homepage_news_count: HomepageCount::Count(3),
            minify: true,
            seo: SeoConfig::default(),
        }
    }
}

impl SiteSettings {
    /// Blog directory name, or `None` when the blog is disabled (`blog_folder = ""`).
    pub fn blog_folder(&self) -> Option<&str> {
        self.blog_folder
            .as_deref()
            .map(str::trim)
            .filter(|folder| !folder.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub alumni_of: Option<String>,
    pub custom_og_image: Option<String>,
    pub custom_knowledge_areas: Option<Vec<String>>,
    pub custom_publisher_name: Option<String>,
    pub custom_publisher_logo: Option<String>,
    pub twitter_card_type: String,
    pub disable_structured_data: bool,
    pub robots_meta: String,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            alumni_of: None,
            custom_og_image: None,
            custom_knowledge_areas: None,
            custom_publisher_name: None,
            custom_publisher_logo: None,
            twitter_card_type: "summary_large_image".to_string(),
            disable_structured_data: false,
            robots_meta: "index, follow".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationsConfig {
    pub bib_path: String,
    #[serde(deserialize_with = "one_or_many")]
    pub highlight_author: Vec<String>,
}

impl Default for PublicationsConfig {
    fn default() -> Self {
        Self {
            bib_path: "publications.bib".to_string(),
            highlight_author: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathJaxConfig {
    pub enabled: bool,
    pub version: String,
    pub cdn_url: Option<String>,
    pub inline_math: Vec<Vec<String>>,
    pub display_math: Vec<Vec<String>>,
    pub process_escapes: bool,
    pub process_environments: bool,
    pub extensions: Vec<String>,
    pub skip_html_tags: Vec<String>,
    pub ignore_html_class: String,
    pub process_html_class: String,
}

impl Default for MathJaxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            version: "3".to_string(),
            cdn_url: None,
            inline_math: delimiter_pairs(&[["$", "$"], ["\\(", "\\)"]]),
            display_math: delimiter_pairs(&[["$$", "$$"], ["\\[", "\\]"]]),
            process_escapes: true,
            process_environments: true,
            extensions: vec!["ams".to_string()],
            skip_html_tags: ["script", "noscript", "style", "textarea", "pre", "code"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignore_html_class: "tex2jax_ignore".to_string(),
            process_html_class: "tex2jax_process".to_string(),
        }
    }
}

fn delimiter_pairs(items: &[[&str; 2]]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|pair| pair.iter().map(|s| s.to_string()).collect())
        .collect()
}

/// How many items a homepage section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomepageCount {
    Count(usize),
    All,
}

impl HomepageCount {
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Count(n) => Some(*n),
            Self::All => None,
        }
    }
}

impl fmt::Display for HomepageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::All => f.write_str("all"),
        }
    }
}

impl Serialize for HomepageCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u64(*n as u64),
            Self::All => serializer.serialize_str("all"),
        }
    }
}

impl<'de> Deserialize<'de> for HomepageCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(usize),
            Word(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Self::Count(n)),
            Raw::Word(word) if word.eq_ignore_ascii_case("all") => Ok(Self::All),
            Raw::Word(word) => Err(serde::de::Error::custom(format!(
                "expected a non-negative count or \"all\", got \"{}\"",
                word
            ))),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v.into_iter().filter(|s| !s.trim().is_empty()).collect(),
    })
}

/// Deserialize an item array, skipping entries that fail validation.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Vec::<toml::Value>::deserialize(deserializer)?;
    let kind = std::any::type_name::<T>().rsplit("::").next().unwrap_or("item");

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match value.try_into::<T>() {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping invalid {} #{}: {}", kind, index + 1, e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = SiteConfig::from_toml("").unwrap();

        assert_eq!(config.theme, "minimal");
        assert_eq!(config.output_path, "_site");
        assert_eq!(config.site.blog_folder.as_deref(), Some("blog"));
        assert_eq!(config.site.homepage_publications_count, HomepageCount::Count(3));
        assert_eq!(config.publications.bib_path, "publications.bib");
        assert!(config.mathjax.enabled);
        assert!(config.news.is_empty());
    }

    #[test]
    fn parses_full_sections() {
        let config = SiteConfig::from_toml(
            r#"
theme = "custom"

[author]
name = "Ada Lovelace"
interests = ["Computing", "Poetry"]
github = "https://github.com/ada"

[[author.service]]
description = "Reviewer"
date = 2023
category = "reviewer"

[site]
title = "Ada"
base_url = "https://ada.example"
homepage_publications_count = "all"
homepage_news_count = 5

[site.seo]
alumni_of = "University of London"

[publications]
highlight_author = "Lovelace"

[[news]]
date = 2024-01-15
content = "Joined the lab"
"#,
        )
        .unwrap();

        assert_eq!(config.theme, "custom");
        assert_eq!(config.author.name, "Ada Lovelace");
        assert_eq!(config.author.social_links(), vec![("github", "https://github.com/ada")]);
        assert_eq!(config.author.service[0].date, "2023");
        assert_eq!(config.site.homepage_publications_count, HomepageCount::All);
        assert_eq!(config.site.homepage_news_count, HomepageCount::Count(5));
        assert_eq!(config.site.seo.alumni_of.as_deref(), Some("University of London"));
        assert_eq!(config.publications.highlight_author, vec!["Lovelace"]);
        assert_eq!(config.news[0].date, "2024-01-15");
    }

    #[test]
    fn skips_invalid_items_but_keeps_the_rest() {
        let config = SiteConfig::from_toml(
            r#"
[[projects]]
title = "Good"
description = "Works"

[[projects]]
title = "Missing description"

[[talks]]
title = "Keynote"
"#,
        )
        .unwrap();

        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.projects[0].title, "Good");
        assert_eq!(config.talks.len(), 1);
    }

    #[test]
    fn highlight_author_accepts_list() {
        let config =
            SiteConfig::from_toml("[publications]\nhighlight_author = [\"A. Lovelace\", \"\"]").unwrap();

        assert_eq!(config.publications.highlight_author, vec!["A. Lovelace"]);
    }

    #[test]
    fn rejects_bad_homepage_count() {
        assert!(SiteConfig::from_toml("[site]\nhomepage_news_count = \"some\"").is_err());
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let temp = tempdir().unwrap();

        assert!(matches!(
            SiteConfig::load(temp.path()),
            Err(ConfigError::NotFound(_))
        ));

        fs::write(temp.path().join(CONFIG_FILE), "[site\ntitle = ").unwrap();
        assert!(matches!(
            SiteConfig::load(temp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn output_dir_is_relative_to_content_parent() {
        let config = SiteConfig::default();

        assert_eq!(
            config.output_dir(Path::new("/work/content")),
            PathBuf::from("/work/_site")
        );
    }
}
