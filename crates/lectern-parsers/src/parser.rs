//! The content parser capability shared by every source format.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::frontmatter::{FrontmatterError, Metadata};
use crate::markdown::MarkdownExtensions;

/// Semantic category of content, independent of the file format it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    BlogPost,
    Page,
    Bio,
    Publication,
    Notebook,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlogPost => "blog_post",
            Self::Page => "page",
            Self::Bio => "bio",
            Self::Publication => "publication",
            Self::Notebook => "notebook",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog_post" => Ok(Self::BlogPost),
            "page" => Ok(Self::Page),
            "bio" => Ok(Self::Bio),
            "publication" => Ok(Self::Publication),
            "notebook" => Ok(Self::Notebook),
            other => Err(ParseError::UnknownContentType(other.to_string())),
        }
    }
}

/// A single unit of parsed content: metadata plus body text.
///
/// The body is raw markdown for text formats and pre-rendered HTML for
/// notebooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawContent {
    pub metadata: Metadata,
    pub content: String,
}

impl RawContent {
    pub fn new(metadata: Metadata, content: impl Into<String>) -> Self {
        Self {
            metadata,
            content: content.into(),
        }
    }

    /// Look up a string metadata value.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Flatten into a single mapping, with the body stored under `content`.
    pub fn into_flat(self) -> Metadata {
        let mut flat = self.metadata;
        flat.insert("content".to_string(), self.content.into());
        flat
    }
}

/// Renders a content field for a given content type.
pub type ContentProcessor = fn(&str, &MarkdownExtensions) -> String;

/// Errors that can occur while parsing content sources.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Frontmatter error in {path}: {source}")]
    Frontmatter {
        path: String,
        #[source]
        source: FrontmatterError,
    },

    #[error("Invalid notebook {path}: {message}")]
    Notebook { path: String, message: String },

    #[error("Invalid bibliography {path} at line {line}: {message}")]
    Bibliography {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Unknown content type: {0}")]
    UnknownContentType(String),
}

impl ParseError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Capability implemented by every content-format parser.
///
/// Parsers are consulted through a [`ParserRegistry`](crate::ParserRegistry),
/// either by file extension or by the content types they declare.
pub trait ContentParser: Send + Sync {
    /// Parser identifier used in diagnostics (e.g. "markdown").
    fn name(&self) -> &'static str;

    /// File extensions handled, lowercase and with the leading dot.
    fn supported_extensions(&self) -> &[&'static str];

    /// Content types this parser can produce.
    fn content_types(&self) -> &[ContentType];

    /// Whether this parser accepts the given file.
    fn can_parse(&self, path: &Path) -> bool;

    /// Parse one file into zero or more content records.
    ///
    /// Single-document formats yield at most one record; bibliographies yield
    /// one per entry.
    fn parse_file(&self, path: &Path) -> Result<Vec<RawContent>, ParseError>;

    /// Parse every supported file in a directory (non-recursive).
    ///
    /// Individual file failures are logged and skipped.
    fn parse_directory(&self, dir: &Path, content_type: Option<ContentType>) -> Vec<RawContent>;

    /// Processor for rendering content of the given type, if this parser has one.
    fn content_processor(&self, _content_type: ContentType) -> Option<ContentProcessor> {
        None
    }
}

/// Lowercased extension of a path with its leading dot (e.g. ".md").
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so "state-of-the-art"
/// becomes "State-Of-The-Art".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    out
}

/// Whether a file should be ignored during directory scans.
pub(crate) fn is_hidden_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('_') || n.starts_with('.'))
        .unwrap_or(true)
}

/// Sort directory records by `date`, newest first. Undated records sort last.
pub(crate) fn finish_directory(items: &mut [RawContent]) {
    items.sort_by(|a, b| {
        let date_a = a.metadata.get("date").map(date_sort_key).unwrap_or_default();
        let date_b = b.metadata.get("date").map(date_sort_key).unwrap_or_default();
        date_b.cmp(&date_a)
    });
}

fn date_sort_key(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn default_slug(raw: &mut RawContent, path: &Path) {
    let has_slug = raw
        .meta_str("slug")
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    if !has_slug {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        raw.metadata.insert("slug".to_string(), stem.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(date: Option<&str>) -> RawContent {
        let mut meta = Metadata::new();
        if let Some(d) = date {
            meta.insert("date".into(), json!(d));
        }
        RawContent::new(meta, "")
    }

    #[test]
    fn content_type_round_trips_through_str() {
        for ct in [
            ContentType::BlogPost,
            ContentType::Page,
            ContentType::Bio,
            ContentType::Publication,
            ContentType::Notebook,
        ] {
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
        }
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn sorts_by_date_descending_with_undated_last() {
        let mut items = vec![record(Some("2023-01-01")), record(None), record(Some("2024-06-01"))];

        finish_directory(&mut items);

        assert_eq!(items[0].meta_str("date"), Some("2024-06-01"));
        assert_eq!(items[1].meta_str("date"), Some("2023-01-01"));
        assert_eq!(items[2].meta_str("date"), None);
    }

    #[test]
    fn defaults_slug_to_stem() {
        let mut raw = record(None);
        default_slug(&mut raw, Path::new("blog/hello-world.md"));
        assert_eq!(raw.meta_str("slug"), Some("hello-world"));

        raw.metadata.insert("slug".into(), json!("custom"));
        default_slug(&mut raw, Path::new("blog/other.md"));
        assert_eq!(raw.meta_str("slug"), Some("custom"));
    }

    #[test]
    fn detects_hidden_names() {
        assert!(is_hidden_name(Path::new("pages/_draft.md")));
        assert!(is_hidden_name(Path::new("pages/.DS_Store")));
        assert!(!is_hidden_name(Path::new("pages/about.md")));
    }

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("getting started"), "Getting Started");
        assert_eq!(title_case("deep LEARNING notes"), "Deep Learning Notes");
        assert_eq!(title_case("state-of-the-art"), "State-Of-The-Art");
    }

    #[test]
    fn dotted_extension_is_lowercase() {
        assert_eq!(dotted_extension(Path::new("a/B.MD")).as_deref(), Some(".md"));
        assert_eq!(dotted_extension(Path::new("Makefile")), None);
    }
}
