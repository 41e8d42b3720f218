//! Theme interface and the minijinja-backed implementation.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{escape_formatter, AutoEscape, Environment, Output, State};
use serde_json::Value;
use walkdir::WalkDir;

use crate::assets::AssetPipeline;
use crate::templates::BUILTIN_TEMPLATES;
use crate::urls::{build_url, is_external_url, resolve_path};

/// Name of the built-in theme.
pub const DEFAULT_THEME: &str = "minimal";

/// Renders components and full pages.
///
/// Rendering never fails: a missing component or a rendering error comes
/// back as an HTML comment so the problem shows up in the output.
pub trait Theme {
    fn name(&self) -> &str;

    /// Render a named component with the given context object.
    fn render_component(&self, name: &str, context: &Value) -> String;

    /// Wrap page content in the full document layout.
    fn render_page(&self, content: &str, context: &Value) -> String;

    fn stylesheet(&self) -> String {
        AssetPipeline::generate_css()
    }

    fn script(&self) -> String {
        AssetPipeline::generate_js()
    }
}

/// Theme built on minijinja templates.
pub struct MinijinjaTheme {
    name: String,
    env: Environment<'static>,
    stylesheet: Option<String>,
    script: Option<String>,
}

impl std::fmt::Debug for MinijinjaTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinijinjaTheme").field("name", &self.name).finish()
    }
}

impl MinijinjaTheme {
    /// The built-in `minimal` theme.
    pub fn minimal() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_formatter(html_formatter);
        env.add_function("url_for", url_for);
        env.add_function("file", static_file);

        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template_owned(name.to_string(), source.to_string())?;
        }

        Ok(Self {
            name: DEFAULT_THEME.to_string(),
            env,
            stylesheet: None,
            script: None,
        })
    }

    /// Select a theme by name.
    ///
    /// `minimal` is built in. Any other name must match a directory under
    /// `<content_dir>/themes/`, whose files override the built-in components;
    /// unknown names fall back to `minimal`.
    pub fn load(name: &str, content_dir: &Path) -> Result<Self, minijinja::Error> {
        let mut theme = Self::minimal()?;
        let theme_dir = theme_dir(content_dir, name);

        if theme_dir.is_dir() {
            theme.name = name.to_string();
            theme.load_overrides(&theme_dir);
        } else if name != DEFAULT_THEME {
            tracing::warn!("Theme '{}' not found, falling back to '{}'", name, DEFAULT_THEME);
        }

        Ok(theme)
    }

    /// Replace or add a component template.
    pub fn add_component(&mut self, name: &str, source: &str) -> Result<(), minijinja::Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    fn load_overrides(&mut self, dir: &Path) {
        let entries = WalkDir::new(dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file());

        for entry in entries {
            let path = entry.path();
            let source = match fs::read_to_string(path) {
                Ok(source) => source,
                Err(e) => {
                    tracing::warn!("Failed to read theme file {}: {}", path.display(), e);
                    continue;
                }
            };

            let file_name = entry.file_name().to_string_lossy();
            match file_name.as_ref() {
                "style.css" => self.stylesheet = Some(source),
                "theme.js" => self.script = Some(source),
                _ if file_name.ends_with(".html") => {
                    let component = file_name.trim_end_matches(".html");
                    if let Err(e) = self.add_component(component, &source) {
                        tracing::warn!("Skipping theme template {}: {}", path.display(), e);
                    } else {
                        tracing::debug!("Theme '{}' overrides component '{}'", self.name, component);
                    }
                }
                _ => {}
            }
        }
    }
}

fn theme_dir(content_dir: &Path, name: &str) -> PathBuf {
    content_dir.join("themes").join(name)
}

impl Theme for MinijinjaTheme {
    fn name(&self) -> &str {
        &self.name
    }

    fn render_component(&self, name: &str, context: &Value) -> String {
        let template = match self.env.get_template(name) {
            Ok(template) => template,
            Err(_) => {
                tracing::warn!("Component '{}' not found in theme '{}'", name, self.name);
                return format!("<!-- Component '{}' not found -->", name);
            }
        };

        match template.render(context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to render component '{}': {}", name, e);
                format!(
                    "<!-- Error rendering component '{}': {} -->",
                    name,
                    e.to_string().replace("--", "-")
                )
            }
        }
    }

    fn render_page(&self, content: &str, context: &Value) -> String {
        let mut context = context.clone();
        if let Value::Object(map) = &mut context {
            map.insert("content".to_string(), Value::String(content.to_string()));
        }
        self.render_component("base", &context)
    }

    fn stylesheet(&self) -> String {
        self.stylesheet
            .clone()
            .unwrap_or_else(AssetPipeline::generate_css)
    }

    fn script(&self) -> String {
        self.script.clone().unwrap_or_else(AssetPipeline::generate_js)
    }
}

fn context_base_url(state: &State) -> String {
    state
        .lookup("base_url")
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// `url_for(path)`: a site page relative to the current base URL.
fn url_for(state: &State, path: String) -> String {
    if is_external_url(&path) {
        return path;
    }
    build_url(&context_base_url(state), &path)
}

/// `file(path)`: a file in the static directory.
fn static_file(state: &State, path: String) -> String {
    if is_external_url(&path) {
        return path;
    }
    let path = format!("static/{}", resolve_path(path.trim_start_matches('/')));
    build_url(&context_base_url(state), &path)
}

/// HTML-escape strings without touching `/`, so URLs stay readable.
fn html_formatter(out: &mut Output, state: &State, value: &minijinja::Value) -> Result<(), minijinja::Error> {
    match value.as_str() {
        Some(text) if !value.is_safe() && matches!(state.auto_escape(), AutoEscape::Html) => {
            for c in text.chars() {
                match c {
                    '&' => out.write_str("&amp;")?,
                    '<' => out.write_str("&lt;")?,
                    '>' => out.write_str("&gt;")?,
                    '"' => out.write_str("&quot;")?,
                    '\'' => out.write_str("&#x27;")?,
                    c => out.write_char(c)?,
                }
            }
            Ok(())
        }
        _ => escape_formatter(out, state, value),
    }
}
