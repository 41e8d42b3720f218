//! Parser registry.
//!
//! Dispatches files to parsers by extension (with a content-sniffing
//! fallback) and content types to the parsers that can produce them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::bibtex::BibtexParser;
use crate::markdown::MarkdownParser;
use crate::notebook::NotebookParser;
use crate::parser::{dotted_extension, ContentParser, ContentType};

/// Catalog of registered content parsers.
///
/// Registration order is significant: it decides which parser wins when
/// several accept the same file or produce the same content type.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn ContentParser>>,
    by_extension: HashMap<String, Vec<Arc<dyn ContentParser>>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the markdown, notebook and bibliography parsers.
    pub fn with_defaults(highlight_authors: &[String]) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MarkdownParser::new()));
        registry.register(Arc::new(NotebookParser::new()));
        registry.register(Arc::new(BibtexParser::new(highlight_authors.iter().cloned())));
        registry
    }

    /// Register a parser. Registering the same instance twice has no effect.
    pub fn register(&mut self, parser: Arc<dyn ContentParser>) -> bool {
        if self.parsers.iter().any(|p| same_parser(p, &parser)) {
            tracing::debug!("Parser '{}' already registered", parser.name());
            return false;
        }

        for ext in parser.supported_extensions() {
            self.by_extension
                .entry(ext.to_lowercase())
                .or_default()
                .push(Arc::clone(&parser));
        }
        self.parsers.push(parser);
        true
    }

    /// Find a parser for a file, or `None` when no parser accepts it.
    ///
    /// Parsers declaring the file's extension are tried first; if none
    /// accepts the file, every registered parser is consulted.
    pub fn parser_for_file(&self, path: &Path) -> Option<Arc<dyn ContentParser>> {
        if let Some(candidates) = dotted_extension(path).and_then(|ext| self.by_extension.get(&ext)) {
            if let Some(parser) = candidates.iter().find(|p| p.can_parse(path)) {
                return Some(Arc::clone(parser));
            }
        }

        self.parsers.iter().find(|p| p.can_parse(path)).cloned()
    }

    /// All parsers that can produce the given content type, in registration order.
    pub fn parsers_for_content_type(&self, content_type: ContentType) -> Vec<Arc<dyn ContentParser>> {
        self.parsers
            .iter()
            .filter(|p| p.content_types().contains(&content_type))
            .cloned()
            .collect()
    }

    /// Every extension with at least one registered parser, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    pub fn parsers(&self) -> &[Arc<dyn ContentParser>] {
        &self.parsers
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.parsers.iter().map(|p| p.name()).collect();
        f.debug_struct("ParserRegistry")
            .field("parsers", &names)
            .finish()
    }
}

fn same_parser(a: &Arc<dyn ContentParser>, b: &Arc<dyn ContentParser>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseError, RawContent};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    /// Accepts any `.txt` file and produces blog posts.
    struct TextParser {
        title: &'static str,
    }

    impl ContentParser for TextParser {
        fn name(&self) -> &'static str {
            self.title
        }

        fn supported_extensions(&self) -> &[&'static str] {
            &[".txt"]
        }

        fn content_types(&self) -> &[ContentType] {
            &[ContentType::BlogPost]
        }

        fn can_parse(&self, path: &Path) -> bool {
            dotted_extension(path).as_deref() == Some(".txt")
        }

        fn parse_file(&self, _path: &Path) -> Result<Vec<RawContent>, ParseError> {
            Ok(Vec::new())
        }

        fn parse_directory(&self, _dir: &Path, _ct: Option<ContentType>) -> Vec<RawContent> {
            Vec::new()
        }
    }

    /// Declares no extensions but sniffs files whose name starts with "sniff".
    struct SniffingParser;

    impl ContentParser for SniffingParser {
        fn name(&self) -> &'static str {
            "sniffing"
        }

        fn supported_extensions(&self) -> &[&'static str] {
            &[]
        }

        fn content_types(&self) -> &[ContentType] {
            &[ContentType::Page]
        }

        fn can_parse(&self, path: &Path) -> bool {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("sniff"))
                .unwrap_or(false)
        }

        fn parse_file(&self, _path: &Path) -> Result<Vec<RawContent>, ParseError> {
            Ok(Vec::new())
        }

        fn parse_directory(&self, _dir: &Path, _ct: Option<ContentType>) -> Vec<RawContent> {
            Vec::new()
        }
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = ParserRegistry::new();
        let parser: Arc<dyn ContentParser> = Arc::new(TextParser { title: "text" });

        assert!(registry.register(Arc::clone(&parser)));
        assert!(!registry.register(Arc::clone(&parser)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_extension[".txt"].len(), 1);
    }

    #[test]
    fn dispatches_by_extension_case_insensitively() {
        let registry = ParserRegistry::with_defaults(&[]);

        let parser = registry.parser_for_file(Path::new("blog/Post.MD")).unwrap();
        assert_eq!(parser.name(), "markdown");

        let parser = registry.parser_for_file(Path::new("refs.bib")).unwrap();
        assert_eq!(parser.name(), "bibtex");
    }

    #[test]
    fn first_registered_parser_wins() {
        let mut registry = ParserRegistry::new();
        registry.register(Arc::new(TextParser { title: "first" }));
        registry.register(Arc::new(TextParser { title: "second" }));

        let parser = registry.parser_for_file(Path::new("notes.txt")).unwrap();

        assert_eq!(parser.name(), "first");
    }

    #[test]
    fn falls_back_to_scanning_all_parsers() {
        let mut registry = ParserRegistry::with_defaults(&[]);
        registry.register(Arc::new(SniffingParser));

        let parser = registry.parser_for_file(Path::new("sniff.data")).unwrap();

        assert_eq!(parser.name(), "sniffing");
    }

    #[test]
    fn reports_no_parser_for_unknown_files() {
        let temp = tempdir().unwrap();
        let fake = temp.path().join("broken.ipynb");
        fs::write(&fake, "not json").unwrap();
        let registry = ParserRegistry::with_defaults(&[]);

        assert!(registry.parser_for_file(Path::new("photo.jpeg")).is_none());
        assert!(registry.parser_for_file(&fake).is_none());
    }

    #[test]
    fn filters_by_content_type_in_registration_order() {
        let registry = ParserRegistry::with_defaults(&[]);

        let names: Vec<_> = registry
            .parsers_for_content_type(ContentType::BlogPost)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["markdown", "notebook"]);

        let names: Vec<_> = registry
            .parsers_for_content_type(ContentType::Publication)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["bibtex"]);
    }

    #[test]
    fn lists_supported_extensions() {
        let registry = ParserRegistry::with_defaults(&[]);

        assert_eq!(
            registry.supported_extensions(),
            vec![".bib", ".bibtex", ".ipynb", ".markdown", ".md", ".mdown", ".mkd"]
        );
    }
}
