//! Item processing: turns content entities into render-ready mappings.
//!
//! Each item passes through a fixed sequence of stages: keep the source
//! text, resolve path fields, render markdown fields, pick the template,
//! pre-render the component and attach a schema. The stages are plain
//! functions over a [`Metadata`] map.

use std::fmt;
use std::str::FromStr;

use lectern_content::{to_metadata, ServiceItem};
use lectern_parsers::{
    render_markdown, title_case, ContentType, MarkdownExtensions, Metadata, ParserRegistry,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::seo::SeoGenerator;
use crate::theme::Theme;
use crate::urls::resolve_path;

/// Fields rendered from markdown to HTML.
pub const MARKDOWN_FIELDS: &[&str] = &["content", "description", "excerpt"];

/// Fields holding a path or URL.
pub const PATH_FIELDS: &[&str] = &[
    "photo",
    "image",
    "paper",
    "code",
    "slides",
    "video",
    "website",
    "demo",
    "release_notes",
    "documentation",
    "tutorial_page",
    "materials",
    "project_page",
    "github",
    "cv",
];

const RAW_KEY: &str = "_raw";
const LEADERSHIP: &str = "leadership";

/// Kind of item being processed; names the default component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Publication,
    Project,
    News,
    Talk,
    BlogPost,
    Service,
}

impl ItemType {
    pub fn template(&self) -> &'static str {
        match self {
            Self::Publication => "publication_item",
            Self::Project => "project_item",
            Self::News => "news_item",
            Self::Talk => "talk_item",
            Self::BlogPost => "blog_post_item",
            Self::Service => "service_item",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template())
    }
}

/// Service entries split for two-tier rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceGroups {
    pub leadership_items: Vec<Metadata>,
    pub review_groups: Vec<ServiceGroup>,
}

impl ServiceGroups {
    pub fn is_empty(&self) -> bool {
        self.leadership_items.is_empty() && self.review_groups.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceGroup {
    pub name: String,
    pub items: Vec<Metadata>,
}

/// Processes items for one base URL.
pub struct ItemProcessor<'a> {
    registry: &'a ParserRegistry,
    theme: &'a dyn Theme,
    extensions: MarkdownExtensions,
    base_url: String,
}

impl<'a> ItemProcessor<'a> {
    pub fn new(
        registry: &'a ParserRegistry,
        theme: &'a dyn Theme,
        extensions: MarkdownExtensions,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            theme,
            extensions,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn theme(&self) -> &'a dyn Theme {
        self.theme
    }

    /// Process typed entities, in order.
    pub fn process_entities<T: Serialize>(
        &self,
        items: &[T],
        item_type: ItemType,
        seo: Option<&SeoGenerator>,
    ) -> Vec<Metadata> {
        let maps = items
            .iter()
            .map(to_metadata)
            .filter(|map| {
                if map.is_empty() {
                    tracing::warn!("Skipping {} that could not be serialized", item_type);
                }
                !map.is_empty()
            })
            .collect();
        self.process(maps, item_type, seo)
    }

    /// Process mappings, in order.
    pub fn process(
        &self,
        items: Vec<Metadata>,
        item_type: ItemType,
        seo: Option<&SeoGenerator>,
    ) -> Vec<Metadata> {
        items
            .into_iter()
            .map(|item| self.process_item(item, item_type, seo))
            .collect()
    }

    pub fn process_item(
        &self,
        mut item: Metadata,
        item_type: ItemType,
        seo: Option<&SeoGenerator>,
    ) -> Metadata {
        preserve_raw(&mut item);
        resolve_item_paths(&mut item);
        render_markdown_fields(&mut item, item_type, |text, content_type| {
            self.render_content(text, content_type)
        });

        let template = template_type(&item, item_type);
        item.insert("template_type".into(), json!(template));

        let context = json!({"item": Value::Object(item.clone()), "base_url": self.base_url});
        let html = self.theme.render_component(&template, &context);
        item.insert("rendered_html".into(), json!(html));

        let schema = match (seo, item_type) {
            (Some(seo), ItemType::Publication) => seo.scholarly_article_schema(&item),
            (Some(seo), ItemType::Project) => seo.software_application_schema(&item),
            _ => String::new(),
        };
        item.insert("rendered_schema".into(), json!(schema));

        item
    }

    /// Render text with the processor registered for `content_type`,
    /// falling back to markdown.
    pub fn render_content(&self, text: &str, content_type: &str) -> String {
        if let Ok(kind) = ContentType::from_str(content_type) {
            let processor = self
                .registry
                .parsers_for_content_type(kind)
                .iter()
                .find_map(|parser| parser.content_processor(kind));
            if let Some(processor) = processor {
                return processor(text, &self.extensions);
            }
        }
        render_markdown(text, &self.extensions)
    }

    /// Process service entries, separating leadership roles from reviewing
    /// work grouped by category.
    pub fn process_service_items(
        &self,
        items: &[ServiceItem],
        seo: Option<&SeoGenerator>,
    ) -> ServiceGroups {
        let (leadership, review): (Vec<&ServiceItem>, Vec<&ServiceItem>) =
            items.iter().partition(|item| item.category == LEADERSHIP);

        let leadership_items = self.process_entities(&leadership, ItemType::Service, seo);
        let review_items = self.process_entities(&review, ItemType::Service, seo);

        let mut review_groups: Vec<ServiceGroup> = Vec::new();
        for item in review_items {
            let category = item
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or("reviewer");
            let name = category_title(category);

            match review_groups.iter_mut().find(|group| group.name == name) {
                Some(group) => group.items.push(item),
                None => review_groups.push(ServiceGroup {
                    name,
                    items: vec![item],
                }),
            }
        }

        ServiceGroups {
            leadership_items,
            review_groups,
        }
    }
}

fn category_title(category: &str) -> String {
    match category {
        "conference" => "Conference".to_string(),
        other => title_case(other),
    }
}

/// Keep the untransformed markdown and path fields under `_raw`, or restore
/// them from a previous run so every stage starts from the source.
pub fn preserve_raw(item: &mut Metadata) {
    if let Some(Value::Object(raw)) = item.get(RAW_KEY).cloned() {
        for (key, value) in raw {
            item.insert(key, value);
        }
    } else {
        let raw: Map<String, Value> = MARKDOWN_FIELDS
            .iter()
            .chain(PATH_FIELDS)
            .filter_map(|key| {
                item.get(*key)
                    .filter(|value| value.is_string())
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect();
        item.insert(RAW_KEY.into(), Value::Object(raw));
    }

    if !item.contains_key("content_raw") {
        if let Some(content) = item.get("content").cloned() {
            item.insert("content_raw".into(), content);
        }
    }
}

/// Resolve every path field; values that are not text become null.
pub fn resolve_item_paths(item: &mut Metadata) {
    for field in PATH_FIELDS {
        let Some(value) = item.get_mut(*field) else {
            continue;
        };
        match value {
            Value::String(path) => *path = resolve_path(path),
            Value::Null => {}
            other => {
                tracing::warn!("Could not resolve path field '{}': {}", field, other);
                *other = Value::Null;
            }
        }
    }
}

/// Render markdown fields in place.
///
/// Blog post bodies are left for the detail page pass; service descriptions
/// stay plain text.
pub fn render_markdown_fields<F>(item: &mut Metadata, item_type: ItemType, render: F)
where
    F: Fn(&str, &str) -> String,
{
    let content_type = item
        .get("content_type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| item_type.template().to_string());

    for key in MARKDOWN_FIELDS {
        if item_type == ItemType::BlogPost && *key == "content" {
            continue;
        }
        if item_type == ItemType::Service && *key == "description" {
            continue;
        }
        if let Some(Value::String(text)) = item.get(*key) {
            if text.is_empty() {
                continue;
            }
            let html = render(text, &content_type);
            item.insert(key.to_string(), Value::String(html));
        }
    }
}

/// Explicit `template_name`, else the item type's component.
pub fn template_type(item: &Metadata, item_type: ItemType) -> String {
    item.get("template_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(item_type.template())
        .to_string()
}
