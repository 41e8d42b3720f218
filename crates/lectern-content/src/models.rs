//! Typed content entities.
//!
//! Config-declared items (news, projects, talks, service) deserialize from
//! `config.toml`; parsed items (bio, blog posts, pages) are built from the
//! flattened metadata of a [`RawContent`](lectern_parsers::RawContent).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Errors raised when a record fails validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid {kind}: {message}")]
    Invalid { kind: &'static str, message: String },

    #[error("Missing required field '{field}' in {kind}")]
    MissingField { kind: &'static str, field: &'static str },
}

/// Accept a string, integer or TOML/YAML date and keep its text form.
pub(crate) fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flexible_text(Value::deserialize(deserializer)?))
}

fn flexible_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // TOML datetimes arrive as a single-key wrapper map
        Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
            Some((_, Value::String(s))) => s,
            Some((_, other)) => other.to_string(),
            None => String::new(),
        },
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bio {
    pub bio: String,
    pub tagline: String,
    pub interests: Vec<String>,
    pub title: String,
    pub affiliation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(default = "default_post_title")]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub date: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub content: String,
    /// Source body before any rendering.
    #[serde(default)]
    pub content_raw: String,
    #[serde(default = "default_post_content_type")]
    pub content_type: String,
    #[serde(default = "default_post_template")]
    pub template_name: String,
}

fn default_post_title() -> String {
    "Untitled".to_string()
}
fn default_post_content_type() -> String {
    "markdown".to_string()
}
fn default_post_template() -> String {
    "blog_post_item".to_string()
}

impl BlogPost {
    /// Build a post from flattened metadata (`content` holds the body).
    pub fn from_metadata(mut metadata: Map<String, Value>) -> Result<Self, ValidationError> {
        if !metadata.contains_key("content_raw") {
            let body = metadata.get("content").cloned().unwrap_or(Value::Null);
            metadata.insert("content_raw".to_string(), body);
        }

        let post: BlogPost =
            serde_json::from_value(Value::Object(metadata)).map_err(|e| ValidationError::Invalid {
                kind: "blog post",
                message: e.to_string(),
            })?;
        post.validate()?;
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_slug("blog post", &self.slug)
    }
}

/// A slug names a single output file: non-empty, no path separators, no `..`.
fn validate_slug(kind: &'static str, slug: &str) -> Result<(), ValidationError> {
    if slug.trim().is_empty() {
        return Err(ValidationError::MissingField { kind, field: "slug" });
    }
    if slug.contains(['/', '\\']) || slug.contains("..") {
        return Err(ValidationError::Invalid {
            kind,
            message: format!("slug '{}' must be a single path segment", slug),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_post_content_type")]
    pub content_type: String,
    #[serde(default = "default_page_template")]
    pub template_name: String,
}

fn default_page_template() -> String {
    "page".to_string()
}

impl Page {
    pub fn from_metadata(metadata: Map<String, Value>) -> Result<Self, ValidationError> {
        let page: Page =
            serde_json::from_value(Value::Object(metadata)).map_err(|e| ValidationError::Invalid {
                kind: "page",
                message: e.to_string(),
            })?;
        validate_slug("page", &page.slug)?;
        Ok(page)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(deserialize_with = "flexible_string")]
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_page: Option<String>,
    #[serde(default = "default_news_template")]
    pub template_name: String,
}

fn default_news_template() -> String {
    "news_item".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default = "default_project_template")]
    pub template_name: String,
}

fn default_project_template() -> String {
    "project_item".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalkItem {
    pub title: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub date: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default, rename = "type")]
    pub talk_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default = "default_talk_template")]
    pub template_name: String,
}

fn default_talk_template() -> String {
    "talk_item".to_string()
}

/// Academic service entry (reviewing, chairing, editorial work).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub description: String,
    #[serde(deserialize_with = "flexible_string")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_service_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

fn default_service_category() -> String {
    "standard".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomepageButton {
    pub text: String,
    pub url: String,
    #[serde(default = "default_button_style")]
    pub style: String,
}

fn default_button_style() -> String {
    "primary".to_string()
}

/// Serialize any entity into the plain mapping the processor works on.
pub fn to_metadata<T: Serialize>(item: &T) -> Map<String, Value> {
    match serde_json::to_value(item) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
