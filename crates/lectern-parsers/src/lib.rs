//! Content parsers for lectern.
//!
//! This crate turns source files (markdown with YAML frontmatter, Jupyter
//! notebooks, BibTeX bibliographies) into raw content records, and provides
//! the registry that picks a parser for a file or a content type.

pub mod bibtex;
pub mod frontmatter;
pub mod markdown;
pub mod notebook;
pub mod parser;
pub mod registry;

pub use bibtex::{BibtexParser, Publication, PublicationLink};
pub use frontmatter::{extract_frontmatter, FrontmatterError, Metadata};
pub use markdown::{render_markdown, MarkdownExtensions, MarkdownParser};
pub use notebook::NotebookParser;
pub use parser::{
    dotted_extension, title_case, ContentParser, ContentProcessor, ContentType, ParseError,
    RawContent,
};
pub use registry::ParserRegistry;
