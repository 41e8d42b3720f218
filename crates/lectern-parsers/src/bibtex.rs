//! BibTeX bibliography parser.
//!
//! Each entry becomes one publication record. Entries without a title or a
//! numeric year are dropped, and the result is ordered newest first.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::frontmatter::Metadata;
use crate::parser::{dotted_extension, ContentParser, ContentType, ParseError, RawContent};

const BIBTEX_EXTENSIONS: &[&str] = &[".bib", ".bibtex"];
const BIBTEX_CONTENT_TYPES: &[ContentType] = &[ContentType::Publication];

/// Fields that only matter to the website and are left out of citations.
const WEBSITE_FIELDS: &[&str] = &[
    "pdf",
    "code",
    "website",
    "video",
    "slides",
    "poster",
    "demo",
    "supplement",
    "supplementary",
    "image",
    "file",
    "mendeley-tags",
    "abstract",
    "highlight",
];

/// A single entry as written in the `.bib` source.
#[derive(Debug, Clone, PartialEq)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    /// Field names are lowercased; source order is preserved.
    pub fields: Vec<(String, String)>,
}

impl BibEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Citation text without website-only fields.
    pub fn citation(&self) -> String {
        let mut out = format!("@{}{{{}", self.entry_type, self.key);
        for (name, value) in &self.fields {
            if WEBSITE_FIELDS.contains(&name.as_str()) {
                continue;
            }
            out.push_str(&format!(",\n  {} = {{{}}}", name, value));
        }
        out.push_str("\n}");
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationLink {
    pub label: String,
    pub url: String,
}

/// A formatted publication, ready to be flattened into item metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publication {
    pub key: String,
    pub entry_type: String,
    pub title: String,
    pub year: i32,
    pub venue: String,
    pub authors: Vec<String>,
    pub highlighted_authors: String,
    pub links: Vec<PublicationLink>,
    pub bibtex: String,
    pub highlight: bool,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}

/// Parser for BibTeX files.
///
/// Holds the author-name terms to highlight in author lists.
#[derive(Debug, Default, Clone)]
pub struct BibtexParser {
    highlight_terms: Vec<String>,
}

impl BibtexParser {
    pub fn new<I, S>(highlight_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            highlight_terms: highlight_terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.trim().is_empty())
                .collect(),
        }
    }

    pub fn highlight_terms(&self) -> &[String] {
        &self.highlight_terms
    }

    /// Parse bibliography text into formatted publications, newest first.
    pub fn parse_str(&self, source: &str, path: &Path) -> Vec<Publication> {
        let mut publications: Vec<_> = read_entries(source, path)
            .iter()
            .filter_map(|entry| self.format_entry(entry))
            .collect();
        publications.sort_by(|a, b| b.year.cmp(&a.year));
        publications
    }

    /// Format an entry, or `None` when it lacks a title or numeric year.
    pub fn format_entry(&self, entry: &BibEntry) -> Option<Publication> {
        let title = entry.field("title")?;
        let year = match entry.field("year")?.trim().parse::<i32>() {
            Ok(year) => year,
            Err(_) => {
                tracing::warn!("Skipping bibliography entry '{}': non-numeric year", entry.key);
                return None;
            }
        };

        let authors = parse_authors(entry.field("author").unwrap_or_default());
        let highlighted_authors = self.highlight_authors(&authors);
        let highlight = entry
            .field("highlight")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "yes" | "1"))
            .unwrap_or(false);

        Some(Publication {
            key: entry.key.clone(),
            entry_type: entry.entry_type.clone(),
            title: strip_braces(title),
            year,
            venue: venue(entry),
            authors,
            highlighted_authors,
            links: extract_links(entry),
            bibtex: entry.citation(),
            highlight,
            abstract_text: entry.field("abstract").map(strip_braces),
        })
    }

    fn highlight_authors(&self, authors: &[String]) -> String {
        authors
            .iter()
            .map(|author| {
                let lower = author.to_lowercase();
                if self
                    .highlight_terms
                    .iter()
                    .any(|term| lower.contains(&term.to_lowercase()))
                {
                    format!("<span class=\"highlight\">{}</span>", author)
                } else {
                    author.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn to_raw(publication: Publication) -> RawContent {
        let body = publication.abstract_text.clone().unwrap_or_default();
        let metadata = match serde_json::to_value(publication) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Metadata::new(),
        };
        RawContent::new(metadata, body)
    }
}

fn strip_braces(text: &str) -> String {
    text.replace(['{', '}'], "")
}

fn venue(entry: &BibEntry) -> String {
    let venue = match entry.entry_type.as_str() {
        "article" => entry.field("journal").unwrap_or("Journal").to_string(),
        "inproceedings" | "conference" => entry
            .field("booktitle")
            .unwrap_or("Conference")
            .replace("Proceedings of", "")
            .trim()
            .to_string(),
        _ => entry
            .field("howpublished")
            .unwrap_or("Publication")
            .to_string(),
    };
    strip_braces(&venue)
}

fn parse_authors(field: &str) -> Vec<String> {
    if field.trim().is_empty() {
        return Vec::new();
    }
    field
        .split(" and ")
        .map(|name| format_author_name(&strip_braces(name)))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Reorder "Last, First" and "Last, Jr, First" into reading order.
fn format_author_name(name: &str) -> String {
    let parts: Vec<&str> = name.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [last, first] if !first.is_empty() => format!("{} {}", first, last),
        [last, jr, first] if !first.is_empty() => format!("{} {} {}", first, last, jr),
        _ => name.trim().to_string(),
    }
}

fn extract_links(entry: &BibEntry) -> Vec<PublicationLink> {
    let mut links = Vec::new();
    let mut push = |label: &str, url: String| {
        links.push(PublicationLink {
            label: label.to_string(),
            url,
        })
    };

    if let Some(doi) = entry.field("doi") {
        push("Paper", format!("https://doi.org/{}", doi));
    } else if let Some(url) = entry.field("url") {
        push("Paper", url.to_string());
    }
    if let Some(pdf) = entry.field("pdf") {
        push("PDF", pdf.to_string());
    }
    if let Some(arxiv) = entry.field("arxiv") {
        if arxiv.starts_with("http") {
            push("arXiv", arxiv.to_string());
        } else {
            push("arXiv", format!("https://arxiv.org/abs/{}", arxiv));
        }
    }
    if let Some(code) = entry.field("code").or_else(|| entry.field("github")) {
        push("Code", code.to_string());
    }
    for (field, label) in [
        ("website", "Website"),
        ("video", "Video"),
        ("slides", "Slides"),
        ("poster", "Poster"),
        ("demo", "Demo"),
    ] {
        if let Some(url) = entry.field(field) {
            push(label, url.to_string());
        }
    }
    if let Some(supplement) = entry
        .field("supplement")
        .or_else(|| entry.field("supplementary"))
    {
        push("Supplement", supplement.to_string());
    }

    links
}

/// Read every well-formed entry from bibliography text.
///
/// A malformed entry is logged and skipped; reading resumes at the next `@`.
pub fn read_entries(source: &str, path: &Path) -> Vec<BibEntry> {
    let mut reader = BibReader::new(source);
    let mut entries = Vec::new();

    while let Some(start) = reader.next_entry_start() {
        match reader.read_item() {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(message) => {
                let err = ParseError::Bibliography {
                    path: path.display().to_string(),
                    line: reader.line_of(start),
                    message,
                };
                tracing::warn!("Skipping entry: {}", err);
                reader.pos = start + 1;
            }
        }
    }

    entries
}

struct BibReader<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    strings: HashMap<String, String>,
}

impl<'a> BibReader<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            strings: HashMap::new(),
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.src[..offset.min(self.src.len())].matches('\n').count() + 1
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn next_entry_start(&mut self) -> Option<usize> {
        let offset = self.src[self.pos..].find('@')?;
        self.pos += offset;
        Some(self.pos)
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b) if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.' | b'+' | b'/')
        ) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    /// Read the item at `@`. Returns `None` for comments, preambles and string macros.
    fn read_item(&mut self) -> Result<Option<BibEntry>, String> {
        self.pos += 1;
        let entry_type = self.read_identifier().to_lowercase();
        if entry_type.is_empty() {
            return Err("missing entry type after '@'".to_string());
        }

        self.skip_whitespace();
        let close = match self.peek() {
            Some(b'{') => b'}',
            Some(b'(') => b')',
            _ => return Err(format!("expected '{{' after @{}", entry_type)),
        };
        self.pos += 1;

        match entry_type.as_str() {
            "comment" | "preamble" => {
                self.skip_balanced(close)?;
                Ok(None)
            }
            "string" => {
                self.skip_whitespace();
                let (name, value) = self.read_field()?;
                self.skip_whitespace();
                self.expect(close)?;
                self.strings.insert(name, value);
                Ok(None)
            }
            _ => self.read_entry(entry_type, close).map(Some),
        }
    }

    fn read_entry(&mut self, entry_type: String, close: u8) -> Result<BibEntry, String> {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b != b',' && b != close) {
            self.pos += 1;
        }
        let key = self.src[start..self.pos].trim().to_string();

        let mut fields = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(format!("expected ',' in entry '{}'", key)),
                None => return Err(format!("unterminated entry '{}'", key)),
            }

            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }
            fields.push(self.read_field()?);
        }

        Ok(BibEntry {
            entry_type,
            key,
            fields,
        })
    }

    fn read_field(&mut self) -> Result<(String, String), String> {
        let name = self.read_identifier().to_lowercase();
        if name.is_empty() {
            return Err("expected field name".to_string());
        }
        self.skip_whitespace();
        self.expect(b'=')?;

        let mut value = String::new();
        loop {
            self.skip_whitespace();
            value.push_str(&self.read_value_piece()?);
            self.skip_whitespace();
            if self.peek() == Some(b'#') {
                self.pos += 1;
            } else {
                break;
            }
        }

        Ok((name, collapse_whitespace(&value)))
    }

    fn read_value_piece(&mut self) -> Result<String, String> {
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                let start = self.pos;
                self.skip_balanced(b'}')?;
                Ok(self.src[start..self.pos - 1].to_string())
            }
            Some(b'"') => {
                self.pos += 1;
                let start = self.pos;
                let mut depth = 0usize;
                loop {
                    match self.peek() {
                        Some(b'{') => depth += 1,
                        Some(b'}') => depth = depth.saturating_sub(1),
                        Some(b'"') if depth == 0 && self.bytes[self.pos - 1] != b'\\' => break,
                        Some(_) => {}
                        None => return Err("unterminated quoted value".to_string()),
                    }
                    self.pos += 1;
                }
                let value = self.src[start..self.pos].to_string();
                self.pos += 1;
                Ok(value)
            }
            Some(_) => {
                let word = self.read_identifier();
                if word.is_empty() {
                    return Err("expected field value".to_string());
                }
                if word.bytes().all(|b| b.is_ascii_digit()) {
                    return Ok(word);
                }
                Ok(self
                    .strings
                    .get(&word.to_lowercase())
                    .cloned()
                    .unwrap_or(word))
            }
            None => Err("unexpected end of input".to_string()),
        }
    }

    /// Advance past the delimiter that closes the current group.
    fn skip_balanced(&mut self, close: u8) -> Result<(), String> {
        let open = if close == b')' { b'(' } else { b'{' };
        let mut depth = 1usize;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err("unbalanced braces".to_string())
    }

    fn expect(&mut self, byte: u8) -> Result<(), String> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(format!("expected '{}'", byte as char))
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ContentParser for BibtexParser {
    fn name(&self) -> &'static str {
        "bibtex"
    }

    fn supported_extensions(&self) -> &[&'static str] {
        BIBTEX_EXTENSIONS
    }

    fn content_types(&self) -> &[ContentType] {
        BIBTEX_CONTENT_TYPES
    }

    fn can_parse(&self, path: &Path) -> bool {
        dotted_extension(path)
            .map(|ext| BIBTEX_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<RawContent>, ParseError> {
        let source = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        Ok(self
            .parse_str(&source, path)
            .into_iter()
            .map(Self::to_raw)
            .collect())
    }

    fn parse_directory(&self, dir: &Path, _content_type: Option<ContentType>) -> Vec<RawContent> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && self.can_parse(p))
            .collect();
        paths.sort();

        let mut publications = Vec::new();
        for path in paths {
            match fs::read_to_string(&path) {
                Ok(source) => publications.extend(self.parse_str(&source, &path)),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        publications.sort_by(|a, b| b.year.cmp(&a.year));

        publications.into_iter().map(Self::to_raw).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const BIB: &str = r#"
@string{neurips = "Advances in Neural Information Processing Systems"}

@comment{ this { is } ignored }

@inproceedings{lovelace2021,
  title = {{Sparse} Attention for Everyone},
  author = {Lovelace, Ada and Babbage, Charles},
  booktitle = {Proceedings of the Example Conference},
  year = 2021,
  pdf = {papers/sparse.pdf},
  highlight = {true}
}

@article{babbage2023,
  title = "Engines of " # "Difference",
  author = {Charles Babbage and Ada Lovelace},
  journal = neurips,
  year = {2023},
  doi = {10.1000/xyz},
  arxiv = {2301.00001},
  abstract = {We describe an engine.}
}

@misc{undated,
  title = {Notes},
  year = {forthcoming}
}

@misc{untitled,
  year = {2020}
}
"#;

    fn parser() -> BibtexParser {
        BibtexParser::new(["Lovelace"])
    }

    #[test]
    fn parses_entries_sorted_by_year() {
        let pubs = parser().parse_str(BIB, Path::new("pubs.bib"));

        let keys: Vec<_> = pubs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["babbage2023", "lovelace2021"]);
    }

    #[test]
    fn formats_publication_fields() {
        let pubs = parser().parse_str(BIB, Path::new("pubs.bib"));
        let article = &pubs[0];
        let paper = &pubs[1];

        assert_eq!(article.title, "Engines of Difference");
        assert_eq!(
            article.venue,
            "Advances in Neural Information Processing Systems"
        );
        assert_eq!(article.abstract_text.as_deref(), Some("We describe an engine."));
        assert!(!article.highlight);

        assert_eq!(paper.title, "Sparse Attention for Everyone");
        assert_eq!(paper.venue, "the Example Conference");
        assert_eq!(paper.authors, vec!["Ada Lovelace", "Charles Babbage"]);
        assert!(paper.highlight);
    }

    #[test]
    fn highlights_configured_authors() {
        let pubs = parser().parse_str(BIB, Path::new("pubs.bib"));

        assert_eq!(
            pubs[1].highlighted_authors,
            "<span class=\"highlight\">Ada Lovelace</span>, Charles Babbage"
        );
    }

    #[test]
    fn extracts_links_in_order() {
        let pubs = parser().parse_str(BIB, Path::new("pubs.bib"));

        let labels: Vec<_> = pubs[0].links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Paper", "arXiv"]);
        assert_eq!(pubs[0].links[0].url, "https://doi.org/10.1000/xyz");
        assert_eq!(pubs[0].links[1].url, "https://arxiv.org/abs/2301.00001");
        assert_eq!(pubs[1].links[0].label, "PDF");
    }

    #[test]
    fn citation_excludes_website_fields() {
        let pubs = parser().parse_str(BIB, Path::new("pubs.bib"));

        assert!(pubs[1].bibtex.starts_with("@inproceedings{lovelace2021"));
        assert!(pubs[1].bibtex.contains("booktitle = {Proceedings of the Example Conference}"));
        assert!(!pubs[1].bibtex.contains("pdf"));
        assert!(!pubs[1].bibtex.contains("highlight"));
        assert!(!pubs[0].bibtex.contains("abstract"));
    }

    #[test]
    fn recovers_after_malformed_entry() {
        let source = "@article{broken, title = }\n@misc{ok, title = {Fine}, year = 2022}";

        let pubs = parser().parse_str(source, Path::new("pubs.bib"));

        assert_eq!(pubs.len(), 1);
        assert_eq!(pubs[0].key, "ok");
    }

    #[test]
    fn parse_file_flattens_into_metadata() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pubs.bib");
        fs::write(&path, BIB).unwrap();

        let records = parser().parse_file(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metadata["year"], 2023);
        assert_eq!(records[0].metadata["links"][0]["label"], "Paper");
        assert_eq!(records[0].content, "We describe an engine.");
        assert!(records[1].metadata.get("abstract").is_none());
    }

    #[test]
    fn reorders_author_names() {
        assert_eq!(format_author_name("Knuth, Donald E."), "Donald E. Knuth");
        assert_eq!(format_author_name("King, Jr, Martin"), "Martin King Jr");
        assert_eq!(format_author_name("Grace Hopper"), "Grace Hopper");
    }
}
