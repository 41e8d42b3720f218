//! Static site generator for lectern.
//!
//! Turns a content directory (configuration, bio, bibliography, blog posts
//! and pages) into a themed static website with SEO metadata and a sitemap.

pub mod assembler;
pub mod assets;
pub mod builder;
pub mod processor;
pub mod seo;
pub mod templates;
pub mod theme;
pub mod urls;

pub use assembler::{Layout, ListPage, PageAssembler};
pub use assets::AssetPipeline;
pub use builder::{build_site, BuildError, BuildResult, SiteBuilder};
pub use processor::{ItemProcessor, ItemType};
pub use seo::{PageType, SeoGenerator, Sitemap, SitemapEntry};
pub use theme::{MinijinjaTheme, Theme, DEFAULT_THEME};
