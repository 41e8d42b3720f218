//! Jupyter notebook parser.
//!
//! Notebooks are rendered to HTML at parse time. Metadata comes from an
//! optional frontmatter block in the first markdown cell, which is removed
//! from the rendered output.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::frontmatter::{extract_frontmatter, Metadata};
use crate::markdown::{render_markdown, MarkdownExtensions};
use crate::parser::{
    default_slug, dotted_extension, finish_directory, is_hidden_name, title_case, ContentParser,
    ContentProcessor, ContentType, ParseError, RawContent,
};

const NOTEBOOK_EXTENSIONS: &[&str] = &[".ipynb"];
const NOTEBOOK_CONTENT_TYPES: &[ContentType] =
    &[ContentType::BlogPost, ContentType::Page, ContentType::Notebook];

#[derive(Debug, Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
    #[serde(default)]
    metadata: NotebookMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct NotebookMetadata {
    #[serde(default)]
    kernelspec: Option<KernelSpec>,
    #[serde(default)]
    language_info: Option<LanguageInfo>,
}

#[derive(Debug, Deserialize)]
struct KernelSpec {
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguageInfo {
    #[serde(default)]
    name: Option<String>,
}

impl NotebookMetadata {
    fn language(&self) -> &str {
        self.language_info
            .as_ref()
            .and_then(|l| l.name.as_deref())
            .or_else(|| self.kernelspec.as_ref().and_then(|k| k.language.as_deref()))
            .unwrap_or("python")
    }
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: MultilineText,
    #[serde(default)]
    outputs: Vec<Output>,
}

/// nbformat stores text either as one string or as a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MultilineText {
    Lines(Vec<String>),
    Text(String),
}

impl Default for MultilineText {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl MultilineText {
    fn text(&self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
enum Output {
    Stream {
        #[serde(default)]
        name: String,
        #[serde(default)]
        text: MultilineText,
    },
    ExecuteResult {
        #[serde(default)]
        data: Map<String, Value>,
    },
    DisplayData {
        #[serde(default)]
        data: Map<String, Value>,
    },
    Error {
        #[serde(default)]
        ename: String,
        #[serde(default)]
        evalue: String,
    },
    #[serde(other)]
    Unknown,
}

/// Parser for Jupyter notebooks (`.ipynb`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NotebookParser;

impl NotebookParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse notebook JSON text into a content record with rendered HTML.
    pub fn parse_str(&self, source: &str, path: &Path) -> Result<RawContent, ParseError> {
        let mut notebook: Notebook =
            serde_json::from_str(source).map_err(|e| ParseError::Notebook {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), title_case(&stem.replace('_', " ")).into());

        if let Some(front) = take_frontmatter_cell(&mut notebook.cells) {
            metadata.extend(front);
        }
        metadata.insert(
            "content_type".to_string(),
            ContentType::Notebook.as_str().into(),
        );

        let html = render_notebook(&notebook);
        Ok(RawContent::new(metadata, html))
    }
}

/// Remove a leading markdown cell that holds valid frontmatter and return its metadata.
fn take_frontmatter_cell(cells: &mut Vec<Cell>) -> Option<Metadata> {
    let first = cells.first()?;
    if first.cell_type != "markdown" {
        return None;
    }

    let source = first.source.text();
    if !source.trim_start().starts_with("---") {
        return None;
    }

    match extract_frontmatter(&source) {
        Ok((metadata, _)) => {
            cells.remove(0);
            Some(metadata)
        }
        Err(e) => {
            tracing::debug!("Leading notebook cell is not frontmatter: {}", e);
            None
        }
    }
}

fn render_notebook(notebook: &Notebook) -> String {
    let extensions = MarkdownExtensions::default();
    let language = notebook.metadata.language();

    let mut html = String::from("<div class=\"notebook\">\n");
    for cell in &notebook.cells {
        match cell.cell_type.as_str() {
            "markdown" => {
                html.push_str("<div class=\"nb-cell nb-markdown\">\n");
                html.push_str(&render_markdown(&cell.source.text(), &extensions));
                html.push_str("</div>\n");
            }
            "code" => {
                let source = cell.source.text();
                html.push_str("<div class=\"nb-cell nb-code\">\n");
                if !source.trim().is_empty() {
                    html.push_str(&format!(
                        "<div class=\"nb-input\"><pre><code class=\"language-{}\">{}</code></pre></div>\n",
                        language,
                        escape_html(&source)
                    ));
                }
                for output in &cell.outputs {
                    html.push_str(&render_output(output));
                }
                html.push_str("</div>\n");
            }
            _ => {
                // Raw cells pass through untouched
                html.push_str(&cell.source.text());
                html.push('\n');
            }
        }
    }
    html.push_str("</div>\n");
    html
}

fn render_output(output: &Output) -> String {
    match output {
        Output::Stream { name, text } => format!(
            "<div class=\"nb-output nb-stream nb-{}\"><pre>{}</pre></div>\n",
            if name.is_empty() { "stdout" } else { name },
            escape_html(&text.text())
        ),
        Output::ExecuteResult { data } | Output::DisplayData { data } => render_rich_output(data),
        Output::Error { ename, evalue } => format!(
            "<div class=\"nb-output nb-error\"><pre>{}: {}</pre></div>\n",
            escape_html(ename),
            escape_html(evalue)
        ),
        Output::Unknown => String::new(),
    }
}

/// Pick the richest representation available in a display bundle.
fn render_rich_output(data: &Map<String, Value>) -> String {
    let body = if let Some(html) = data.get("text/html") {
        value_text(html)
    } else if let Some(svg) = data.get("image/svg+xml") {
        value_text(svg)
    } else if let Some(png) = data.get("image/png") {
        format!(
            "<img src=\"data:image/png;base64,{}\" alt=\"output\">",
            value_text(png).trim()
        )
    } else if let Some(jpeg) = data.get("image/jpeg") {
        format!(
            "<img src=\"data:image/jpeg;base64,{}\" alt=\"output\">",
            value_text(jpeg).trim()
        )
    } else if let Some(text) = data.get("text/plain") {
        format!("<pre>{}</pre>", escape_html(&value_text(text)))
    } else {
        return String::new();
    };

    format!("<div class=\"nb-output nb-result\">{}</div>\n", body)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(lines) => lines.iter().filter_map(|l| l.as_str()).collect(),
        other => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Notebook bodies are already HTML.
fn passthrough(content: &str, _extensions: &MarkdownExtensions) -> String {
    content.to_string()
}

impl ContentParser for NotebookParser {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        NOTEBOOK_EXTENSIONS
    }

    fn content_types(&self) -> &[ContentType] {
        NOTEBOOK_CONTENT_TYPES
    }

    /// Accept `.ipynb` files whose JSON actually has a `cells` array.
    fn can_parse(&self, path: &Path) -> bool {
        if dotted_extension(path).as_deref() != Some(".ipynb") {
            return false;
        }

        fs::read_to_string(path)
            .ok()
            .and_then(|source| serde_json::from_str::<Value>(&source).ok())
            .map(|json| json.get("cells").map(Value::is_array).unwrap_or(false))
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
            let untitled = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("Untitled"))
                .unwrap_or(false);
            if !path.is_file() || is_hidden_name(&path) || untitled || !self.can_parse(&path) {
                continue;
            }

            match self.parse_file(&path) {
                Ok(records) => {
                    for mut raw in records {
                        default_slug(&mut raw, &path);
                        items.push(raw);
                    }
                }
                Err(e) => tracing::warn!("Skipping notebook {}: {}", path.display(), e),
            }
        }

        finish_directory(&mut items);
        items
    }

    fn content_processor(&self, content_type: ContentType) -> Option<ContentProcessor> {
        match content_type {
            ContentType::Notebook => Some(passthrough),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const NOTEBOOK: &str = r##"{
  "cells": [
    {"cell_type": "markdown", "source": ["---\n", "title: Fitting Curves\n", "date: 2024-02-02\n", "---\n"]},
    {"cell_type": "markdown", "source": "# Intro\nSome **bold** text."},
    {"cell_type": "code", "source": ["x = 1 < 2\n", "print(x)"], "outputs": [
      {"output_type": "stream", "name": "stdout", "text": ["True\n"]},
      {"output_type": "execute_result", "data": {"text/plain": ["'<done>'"]}, "execution_count": 1}
    ]}
  ],
  "metadata": {"language_info": {"name": "python"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"##;

    #[test]
    fn parses_frontmatter_cell_and_renders_html() {
        let raw = NotebookParser::new()
            .parse_str(NOTEBOOK, Path::new("blog/curve_fitting.ipynb"))
            .unwrap();

        assert_eq!(raw.meta_str("title"), Some("Fitting Curves"));
        assert_eq!(raw.meta_str("date"), Some("2024-02-02"));
        assert_eq!(raw.meta_str("content_type"), Some("notebook"));
        assert!(!raw.content.contains("title: Fitting Curves"));
        assert!(raw.content.contains("<h1>Intro</h1>"));
        assert!(raw.content.contains("x = 1 &lt; 2"));
        assert!(raw.content.contains("class=\"language-python\""));
        assert!(raw.content.contains("True"));
        assert!(raw.content.contains("&#39;&lt;done&gt;&#39;"));
    }

    #[test]
    fn defaults_title_from_file_stem() {
        let source = r#"{"cells": [{"cell_type": "code", "source": "1 + 1", "outputs": []}]}"#;

        let raw = NotebookParser::new()
            .parse_str(source, Path::new("linear_regression_basics.ipynb"))
            .unwrap();

        assert_eq!(raw.meta_str("title"), Some("Linear Regression Basics"));
    }

    #[test]
    fn can_parse_sniffs_notebook_structure() {
        let temp = tempdir().unwrap();
        let real = temp.path().join("real.ipynb");
        let fake = temp.path().join("fake.ipynb");
        fs::write(&real, NOTEBOOK).unwrap();
        fs::write(&fake, "{\"not\": \"a notebook\"}").unwrap();

        let parser = NotebookParser::new();
        assert!(parser.can_parse(&real));
        assert!(!parser.can_parse(&fake));
        assert!(!parser.can_parse(&temp.path().join("missing.ipynb")));
    }

    #[test]
    fn parse_directory_skips_untitled_notebooks() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("analysis.ipynb"), NOTEBOOK).unwrap();
        fs::write(temp.path().join("Untitled1.ipynb"), NOTEBOOK).unwrap();

        let items = NotebookParser::new().parse_directory(temp.path(), None);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meta_str("slug"), Some("analysis"));
    }

    #[test]
    fn only_processes_notebook_content() {
        let parser = NotebookParser::new();
        let processor = parser.content_processor(ContentType::Notebook).unwrap();

        assert_eq!(processor("<p>x</p>", &MarkdownExtensions::default()), "<p>x</p>");
        assert!(parser.content_processor(ContentType::BlogPost).is_none());
    }
}
