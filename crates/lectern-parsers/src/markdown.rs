//! Markdown parser with YAML frontmatter, plus the shared markdown renderer.

use std::fs;
use std::path::Path;

use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

use crate::frontmatter::extract_frontmatter;
use crate::parser::{
    default_slug, dotted_extension, finish_directory, is_hidden_name, ContentParser,
    ContentProcessor, ContentType, ParseError, RawContent,
};

/// Named markdown extensions enabled for content rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkdownExtensions(Vec<String>);

impl MarkdownExtensions {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Map extension names onto pulldown-cmark options.
    pub fn options(&self) -> Options {
        let mut options = Options::empty();
        for name in &self.0 {
            match name.as_str() {
                "tables" => options.insert(Options::ENABLE_TABLES),
                "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
                "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
                "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
                "smart_punctuation" => options.insert(Options::ENABLE_SMART_PUNCTUATION),
                "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
                other => tracing::debug!("Ignoring unknown markdown extension '{}'", other),
            }
        }
        options
    }
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self::new(["tables", "footnotes", "strikethrough", "tasklists"])
    }
}

/// Render markdown to HTML after removing common indentation.
pub fn render_markdown(source: &str, extensions: &MarkdownExtensions) -> String {
    let normalized = dedent(source);
    let parser = Parser::new_ext(normalized.trim(), extensions.options());

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Remove the leading spaces and tabs that every non-blank line shares.
///
/// Only an identical prefix is removed, so a tab never matches a space.
/// Whitespace-only lines become empty.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_indent)
        .reduce(common_prefix)
        .unwrap_or("");

    if margin.is_empty() {
        return text.to_string();
    }

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn leading_indent(line: &str) -> &str {
    let rest = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - rest.len()]
}

/// Longest shared prefix of two indents (both ASCII spaces and tabs).
fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// Parser for markdown files with YAML frontmatter.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownParser;

const MARKDOWN_EXTENSIONS: &[&str] = &[".md", ".markdown", ".mdown", ".mkd"];
const MARKDOWN_CONTENT_TYPES: &[ContentType] =
    &[ContentType::BlogPost, ContentType::Page, ContentType::Bio];

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse markdown source text into a content record.
    pub fn parse_str(&self, source: &str, path: &Path) -> Result<RawContent, ParseError> {
        let (metadata, body) =
            extract_frontmatter(source).map_err(|source| ParseError::Frontmatter {
                path: path.display().to_string(),
                source,
            })?;
        Ok(RawContent::new(metadata, body))
    }
}

impl ContentParser for MarkdownParser {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        MARKDOWN_EXTENSIONS
    }

    fn content_types(&self) -> &[ContentType] {
        MARKDOWN_CONTENT_TYPES
    }

    fn can_parse(&self, path: &Path) -> bool {
        dotted_extension(path)
            .map(|ext| MARKDOWN_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<RawContent>, ParseError> {
        let source = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        Ok(vec![self.parse_str(&source, path)?])
    }

    fn parse_directory(&self, dir: &Path, _content_type: Option<ContentType>) -> Vec<RawContent> {
        let mut items = Vec::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", dir.display(), e);
                return items;
            }
        };

        let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if !path.is_file() || !self.can_parse(&path) || is_hidden_name(&path) {
                continue;
            }

            match self.parse_file(&path) {
                Ok(records) => {
                    for mut raw in records {
                        default_slug(&mut raw, &path);
                        items.push(raw);
                    }
                }
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        finish_directory(&mut items);
        items
    }

    fn content_processor(&self, _content_type: ContentType) -> Option<ContentProcessor> {
        Some(render_markdown)
    }
}
