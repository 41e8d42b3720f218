//! Page assembly: list pages and the home page.

use lectern_content::{Bio, HomepageCount, SiteConfig};
use lectern_parsers::{ContentType, Metadata};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::processor::{ItemProcessor, ItemType};
use crate::seo::SeoGenerator;
use crate::urls::resolve_path;

/// How items are laid out on a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    Timeline,
}

/// A list page to build.
#[derive(Debug, Clone)]
pub struct ListPage<'t> {
    pub title: &'t str,
    pub filename: &'t str,
    pub item_type: ItemType,
    pub columns: u8,
    pub layout: Layout,
    pub group_by: Option<&'t str>,
    pub has_search: bool,
}

/// Items sharing one grouping key.
#[derive(Debug, Clone, Serialize)]
pub struct ItemGroup {
    pub group_name: String,
    pub items: Vec<Metadata>,
}

/// What the theme's `page_layout` component receives.
#[derive(Debug, Clone, Serialize)]
pub struct PageDescriptor {
    pub title: String,
    pub filename: String,
    pub columns: u8,
    pub layout: Layout,
    pub items_html: String,
    pub grouped_items: Option<Vec<ItemGroup>>,
    pub has_search: bool,
    pub base_url: String,
}

/// A rendered list page body and its combined item schemas.
#[derive(Debug, Clone)]
pub struct AssembledPage {
    pub descriptor: PageDescriptor,
    pub content: String,
    pub structured_data: Option<String>,
}

pub struct PageAssembler<'a> {
    processor: &'a ItemProcessor<'a>,
    seo: Option<&'a SeoGenerator<'a>>,
    debug: bool,
}

impl<'a> PageAssembler<'a> {
    pub fn new(
        processor: &'a ItemProcessor<'a>,
        seo: Option<&'a SeoGenerator<'a>>,
        debug: bool,
    ) -> Self {
        Self {
            processor,
            seo,
            debug,
        }
    }

    /// Process items and render them into the `page_layout` component.
    pub fn list_page(&self, page: &ListPage<'_>, items: Vec<Metadata>) -> AssembledPage {
        let processed = self.processor.process(items, page.item_type, self.seo);

        let schemas: Vec<&str> = processed
            .iter()
            .filter_map(|item| item.get("rendered_schema").and_then(Value::as_str))
            .filter(|schema| !schema.is_empty())
            .collect();
        let structured_data = (!schemas.is_empty()).then(|| format!("[{}]", schemas.join(",")));

        let (items_html, grouped_items) = match page.group_by {
            Some(key) => (String::new(), Some(group_items(processed, key))),
            None => (
                processed
                    .iter()
                    .filter_map(|item| item.get("rendered_html").and_then(Value::as_str))
                    .collect::<String>(),
                None,
            ),
        };

        let descriptor = PageDescriptor {
            title: page.title.to_string(),
            filename: page.filename.to_string(),
            columns: page.columns,
            layout: page.layout,
            items_html,
            grouped_items,
            has_search: page.has_search,
            base_url: self.processor.base_url().to_string(),
        };

        let context = serde_json::to_value(&descriptor).unwrap_or(Value::Null);
        let content = self
            .processor
            .theme()
            .render_component("page_layout", &context);

        AssembledPage {
            descriptor,
            content,
            structured_data,
        }
    }

    /// Render the home page body: the hero followed by every non-empty section.
    pub fn home_page(&self, config: &SiteConfig, bio: &Bio, publications: &[Metadata]) -> String {
        let base_url = self.processor.base_url();
        let theme = self.processor.theme();
        let hero = hero_context(config, bio);

        let (homepage_pubs, has_highlights) =
            select_homepage_publications(publications, config.site.homepage_publications_count);
        let publications_title = if has_highlights {
            "Selected Publications"
        } else {
            "Recent Publications"
        };

        let featured: Vec<_> = config.projects.iter().filter(|p| p.highlight).collect();
        let news = match config.site.homepage_news_count.limit() {
            Some(limit) => &config.news[..limit.min(config.news.len())],
            None => &config.news[..],
        };

        let bio_html = if bio.bio.trim().is_empty() {
            String::new()
        } else {
            self.processor
                .render_content(&bio.bio, ContentType::Bio.as_str())
        };

        let service = self
            .processor
            .process_service_items(&config.author.service, self.seo);

        let sections = [
            (
                "bio",
                !bio_html.is_empty(),
                json!({
                    "title": "About Me",
                    "layout": "bio",
                    "content": bio_html,
                    "interests": bio.interests,
                }),
            ),
            (
                "featured_work",
                !featured.is_empty(),
                json!({
                    "title": "Featured Work",
                    "layout": "grid",
                    "grid_cols": 2,
                    "items": self.processor.process_entities(&featured, ItemType::Project, self.seo),
                    "view_all_link": "projects.html",
                    "view_all_text": "View all projects",
                }),
            ),
            (
                "academic_service",
                !service.is_empty(),
                json!({
                    "title": "Academic Service",
                    "layout": "service",
                    "items": service,
                }),
            ),
            (
                "publications",
                !homepage_pubs.is_empty(),
                json!({
                    "title": publications_title,
                    "layout": "list",
                    "items": self.processor.process(homepage_pubs, ItemType::Publication, self.seo),
                    "view_all_link": "publications.html",
                    "view_all_text": "View all publications",
                }),
            ),
            (
                "news",
                !news.is_empty(),
                json!({
                    "title": "Recent News",
                    "layout": "timeline",
                    "items": self.processor.process_entities(news, ItemType::News, self.seo),
                    "view_all_link": "news.html",
                    "view_all_text": "View all news",
                }),
            ),
        ];

        let total = sections.len();
        let mut rendered = Vec::new();
        for (id, has_content, mut data) in sections {
            if !has_content {
                if self.debug {
                    tracing::info!("Skipping empty homepage section '{}'", id);
                }
                continue;
            }

            if let Value::Object(map) = &mut data {
                map.insert("base_url".into(), json!(base_url));
            }
            let html = theme.render_component("section", &data);
            if html.trim().is_empty() {
                if self.debug {
                    tracing::info!("Homepage section '{}' rendered empty", id);
                }
                continue;
            }
            rendered.push(html);
        }

        if self.debug {
            tracing::info!(
                "Homepage sections: {} defined, {} rendered",
                total,
                rendered.len()
            );
        }

        theme.render_component(
            "landing_page",
            &json!({"hero": hero, "sections": rendered, "base_url": base_url}),
        )
    }
}

/// Bucket items by a key and order the buckets newest first.
///
/// Keys that all parse as integers sort numerically; otherwise they sort as
/// text, descending. Items without the key are left out.
pub fn group_items(items: Vec<Metadata>, key: &str) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();

    for item in items {
        let Some(name) = group_key(item.get(key)) else {
            continue;
        };
        match groups.iter_mut().find(|group| group.group_name == name) {
            Some(group) => group.items.push(item),
            None => groups.push(ItemGroup {
                group_name: name,
                items: vec![item],
            }),
        }
    }

    let numeric: Option<Vec<i64>> = groups
        .iter()
        .map(|group| group.group_name.trim().parse::<i64>().ok())
        .collect();

    match numeric {
        Some(_) => groups.sort_by_cached_key(|group| {
            std::cmp::Reverse(group.group_name.trim().parse::<i64>().unwrap_or_default())
        }),
        None => groups.sort_by(|a, b| b.group_name.cmp(&a.group_name)),
    }

    groups
}

fn group_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn is_highlighted(item: &Metadata) -> bool {
    item.get("highlight").and_then(Value::as_bool).unwrap_or(false)
}

/// Highlighted publications first, topped up with the most recent others.
///
/// Returns the selection and whether any publication is highlighted.
pub fn select_homepage_publications(
    publications: &[Metadata],
    count: HomepageCount,
) -> (Vec<Metadata>, bool) {
    let (highlighted, recent): (Vec<&Metadata>, Vec<&Metadata>) =
        publications.iter().partition(|p| is_highlighted(p));
    let has_highlights = !highlighted.is_empty();

    let selection = match count.limit() {
        Some(limit) => highlighted
            .into_iter()
            .chain(recent)
            .take(limit)
            .cloned()
            .collect(),
        None => highlighted.into_iter().chain(recent).cloned().collect(),
    };

    (selection, has_highlights)
}

/// Author details for the `profile_hero` component.
pub fn hero_context(config: &SiteConfig, bio: &Bio) -> Value {
    let author = &config.author;
    let mut hero = Map::new();

    hero.insert("name".into(), json!(author.name));
    hero.insert("title".into(), json!(non_empty_or(&bio.title, &author.title)));
    hero.insert(
        "affiliation".into(),
        json!(non_empty_or(&bio.affiliation, &author.affiliation)),
    );
    hero.insert("tagline".into(), json!(non_empty_or(&bio.tagline, &author.tagline)));
    hero.insert("email".into(), json!(author.email));
    hero.insert("interests".into(), json!(bio.interests));

    let photo = (!author.photo_path.is_empty()).then(|| resolve_path(&author.photo_path));
    hero.insert("photo".into(), json!(photo));
    hero.insert(
        "cv_path".into(),
        json!(author.cv_path.as_deref().map(resolve_path)),
    );

    let actions: Vec<Value> = author
        .homepage_buttons
        .iter()
        .map(|button| {
            json!({
                "text": button.text,
                "url": button.url,
                "style": button.style,
                "external": button.url.starts_with("http"),
            })
        })
        .collect();
    hero.insert("actions".into(), Value::Array(actions));

    let social_links: Vec<Value> = author
        .social_links()
        .into_iter()
        .map(|(key, url)| json!({"url": url, "label": social_label(key)}))
        .collect();
    hero.insert("social_links".into(), Value::Array(social_links));

    Value::Object(hero)
}

fn non_empty_or<'s>(preferred: &'s str, fallback: &'s str) -> &'s str {
    if preferred.trim().is_empty() {
        fallback
    } else {
        preferred
    }
}

fn social_label(key: &str) -> &'static str {
    match key {
        "github" => "GitHub",
        "scholar" => "Google Scholar",
        "linkedin" => "LinkedIn",
        "twitter" => "Twitter",
        _ => "Link",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::EchoTheme;
    use lectern_parsers::{MarkdownExtensions, ParserRegistry};
    use pretty_assertions::assert_eq;

    fn map(value: Value) -> Metadata {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn publication(title: &str, year: i64, highlight: bool) -> Metadata {
        map(json!({"title": title, "year": year, "highlight": highlight}))
    }

    fn titles(items: &[Metadata]) -> Vec<&str> {
        items.iter().map(|i| i["title"].as_str().unwrap()).collect()
    }

    #[test]
    fn groups_numeric_keys_descending() {
        let items = vec![
            map(json!({"title": "a", "year": "2019"})),
            map(json!({"title": "b", "year": "2023"})),
            map(json!({"title": "c", "year": "2021"})),
            map(json!({"title": "d", "year": "2023"})),
            map(json!({"title": "e"})),
        ];

        let groups = group_items(items, "year");

        let keys: Vec<&str> = groups.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(keys, vec!["2023", "2021", "2019"]);
        assert_eq!(titles(&groups[0].items), vec!["b", "d"]);
    }

    #[test]
    fn groups_numbers_by_value_not_text() {
        let items = vec![
            map(json!({"year": 999})),
            map(json!({"year": 2001})),
        ];

        let keys: Vec<String> = group_items(items, "year")
            .into_iter()
            .map(|g| g.group_name)
            .collect();

        assert_eq!(keys, vec!["2001", "999"]);
    }

    #[test]
    fn non_numeric_keys_sort_as_text() {
        let items = vec![
            map(json!({"venue": "Beta"})),
            map(json!({"venue": "Alpha"})),
            map(json!({"venue": "2020"})),
        ];

        let keys: Vec<String> = group_items(items, "venue")
            .into_iter()
            .map(|g| g.group_name)
            .collect();

        assert_eq!(keys, vec!["Beta", "Alpha", "2020"]);
    }

    #[test]
    fn highlighted_publications_come_first() {
        let publications = vec![
            publication("p2024", 2024, false),
            publication("p2023", 2023, true),
            publication("p2022", 2022, false),
            publication("p2021", 2021, true),
            publication("p2020", 2020, false),
        ];

        let (selected, has_highlights) =
            select_homepage_publications(&publications, HomepageCount::Count(3));

        assert!(has_highlights);
        assert_eq!(titles(&selected), vec!["p2023", "p2021", "p2024"]);

        let (all, _) = select_homepage_publications(&publications, HomepageCount::All);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn list_page_concatenates_item_html() {
        let registry = ParserRegistry::with_defaults(&[]);
        let processor = ItemProcessor::new(&registry, &EchoTheme, MarkdownExtensions::default(), "");
        let assembler = PageAssembler::new(&processor, None, false);
        let page = ListPage {
            title: "Talks",
            filename: "talks.html",
            item_type: ItemType::Talk,
            columns: 1,
            layout: Layout::Timeline,
            group_by: None,
            has_search: false,
        };

        let assembled = assembler.list_page(
            &page,
            vec![map(json!({"title": "One"})), map(json!({"title": "Two"}))],
        );

        assert_eq!(assembled.descriptor.items_html, "[talk_item:One][talk_item:Two]");
        assert_eq!(assembled.content, "[page_layout:Talks]");
        assert!(assembled.structured_data.is_none());
    }

    #[test]
    fn list_page_combines_item_schemas() {
        let registry = ParserRegistry::with_defaults(&[]);
        let config = SiteConfig::default();
        let seo = SeoGenerator::new(&config, "");
        let processor = ItemProcessor::new(&registry, &EchoTheme, MarkdownExtensions::default(), "");
        let assembler = PageAssembler::new(&processor, Some(&seo), false);
        let page = ListPage {
            title: "Publications",
            filename: "publications.html",
            item_type: ItemType::Publication,
            columns: 1,
            layout: Layout::Grid,
            group_by: Some("year"),
            has_search: true,
        };

        let assembled = assembler.list_page(
            &page,
            vec![publication("a", 2020, false), publication("b", 2021, false)],
        );

        let schemas: Value =
            serde_json::from_str(assembled.structured_data.as_deref().unwrap()).unwrap();
        assert_eq!(schemas.as_array().unwrap().len(), 2);
        let groups = assembled.descriptor.grouped_items.unwrap();
        assert_eq!(groups[0].group_name, "2021");
    }

    #[test]
    fn hero_keeps_only_configured_social_links() {
        let config = SiteConfig::from_toml(
            r#"
[author]
name = "Ada"
photo_path = "static/ada.jpg"
scholar = "https://scholar.example/ada"

[[author.homepage_buttons]]
text = "CV"
url = "cv.pdf"

[[author.homepage_buttons]]
text = "Lab"
url = "https://lab.example"
style = "secondary"
"#,
        )
        .unwrap();

        let hero = hero_context(&config, &Bio::default());

        assert_eq!(hero["photo"], "ada.jpg");
        assert_eq!(
            hero["social_links"],
            json!([{"url": "https://scholar.example/ada", "label": "Google Scholar"}])
        );
        assert_eq!(hero["actions"][0]["external"], false);
        assert_eq!(hero["actions"][1]["external"], true);
        assert_eq!(hero["title"], "Your Title");
    }

    #[test]
    fn home_page_skips_empty_sections() {
        let registry = ParserRegistry::with_defaults(&[]);
        let theme = crate::theme::MinijinjaTheme::minimal().unwrap();
        let processor = ItemProcessor::new(&registry, &theme, MarkdownExtensions::default(), "");
        let assembler = PageAssembler::new(&processor, None, false);
        let config = SiteConfig::from_toml(
            r#"
[[news]]
date = "2024-02-01"
content = "Started a *new* position"
"#,
        )
        .unwrap();
        let bio = Bio {
            bio: "I study **engines**.".to_string(),
            ..Bio::default()
        };

        let html = assembler.home_page(&config, &bio, &[]);

        assert!(html.contains("About Me"));
        assert!(html.contains("<strong>engines</strong>"));
        assert!(html.contains("Recent News"));
        assert!(html.contains("<em>new</em>"));
        assert!(!html.contains("Featured Work"));
        assert!(!html.contains("Publications"));
        assert!(!html.contains("Academic Service"));
    }
}
