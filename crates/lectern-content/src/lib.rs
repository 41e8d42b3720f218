//! Site configuration, typed content entities and content loading for lectern.

pub mod config;
pub mod loader;
pub mod models;

pub use config::{
    AuthorConfig, ConfigError, HomepageCount, MathJaxConfig, PublicationsConfig, SeoConfig,
    SiteConfig, SiteSettings, CONFIG_FILE,
};
pub use loader::{Content, ContentLoader};
pub use models::{
    to_metadata, Bio, BlogPost, HomepageButton, NewsItem, Page, ProjectItem, ServiceItem,
    TalkItem, ValidationError,
};
