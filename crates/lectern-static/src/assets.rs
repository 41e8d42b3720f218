//! Theme assets and static file copying.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The built-in theme stylesheet.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// The built-in theme script (cite buttons and list search).
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Minify when asked, keeping the original text if minification fails.
    pub fn prepare_css(css: &str, minify: bool) -> String {
        if !minify {
            return css.to_string();
        }
        match Self::minify_css(css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("{}; writing unminified stylesheet", e);
                css.to_string()
            }
        }
    }

    /// Recursively copy a directory, returning the number of files copied.
    pub fn copy_dir(src: &Path, dest: &Path) -> io::Result<usize> {
        let mut copied = 0;

        for entry in WalkDir::new(src).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let relative = match entry.path().strip_prefix(src) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                copied += 1;
            }
        }

        Ok(copied)
    }
}

const DEFAULT_CSS: &str = r#"/* lectern minimal theme */

:root {
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #57606a;
  --border: #d8dee4;
  --primary: #1f5fbf;
  --primary-foreground: #ffffff;
  --highlight: #fff4c2;
  --content-max-width: 920px;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: var(--primary);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}

.container {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 2rem 1.25rem 4rem;
}

.navbar {
  border-bottom: 1px solid var(--border);
}

.nav-inner {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 0.75rem 1.25rem;
  display: flex;
  align-items: center;
  justify-content: space-between;
  flex-wrap: wrap;
}

.nav-brand {
  font-weight: 600;
  color: var(--foreground);
}

.nav-links {
  list-style: none;
  display: flex;
  gap: 1rem;
  margin: 0;
  padding: 0;
}

.nav-links a {
  color: var(--muted);
}

.nav-links a.active {
  color: var(--foreground);
  font-weight: 600;
}

.hero {
  display: flex;
  gap: 2rem;
  align-items: center;
  margin-bottom: 2rem;
}

.hero-photo {
  width: 160px;
  height: 160px;
  border-radius: 50%;
  object-fit: cover;
}

.hero-title,
.hero-tagline {
  color: var(--muted);
  margin: 0.25rem 0;
}

.social-links,
.hero-actions,
.item-links,
.tags {
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
  margin-top: 0.5rem;
}

.button,
.link-button {
  display: inline-block;
  padding: 0.25rem 0.75rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  font-size: 0.875rem;
  background: none;
  color: var(--primary);
  cursor: pointer;
}

.button-primary {
  background: var(--primary);
  border-color: var(--primary);
  color: var(--primary-foreground);
}

.section-divider {
  border: none;
  border-top: 1px solid var(--border);
  margin: 2.5rem 0;
}

.items {
  display: flex;
  flex-direction: column;
  gap: 1.25rem;
}

.items.grid-2 {
  display: grid;
  grid-template-columns: repeat(2, minmax(0, 1fr));
}

.items.timeline {
  border-left: 2px solid var(--border);
  padding-left: 1.25rem;
}

.item-title {
  margin: 0 0 0.25rem;
  font-size: 1.05rem;
}

.authors,
.venue,
.post-date,
.collaborators {
  margin: 0.125rem 0;
  color: var(--muted);
}

.highlight {
  font-weight: 600;
  text-decoration: underline;
}

.highlighted {
  border-left: 3px solid var(--primary);
  padding-left: 0.75rem;
}

.project-card,
.blog-card {
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 1rem;
}

.project-image,
.blog-card-image,
.post-image {
  width: 100%;
  border-radius: 6px;
}

.tag {
  font-size: 0.75rem;
  padding: 0.125rem 0.5rem;
  border-radius: 999px;
  background: var(--highlight);
}

.news-date,
.talk-date,
.service-date {
  font-size: 0.875rem;
  color: var(--muted);
}

.service-list {
  list-style: none;
  padding: 0;
}

.service-item {
  margin: 0.5rem 0;
}

.service-subtitle,
.service-highlight {
  margin-left: 0.5rem;
  color: var(--muted);
}

.search-bar input {
  width: 100%;
  padding: 0.5rem 0.75rem;
  margin-bottom: 1.5rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  font-size: 1rem;
}

.footer {
  text-align: center;
  color: var(--muted);
  font-size: 0.875rem;
  padding: 2rem 0;
  border-top: 1px solid var(--border);
}

pre {
  overflow-x: auto;
  padding: 1rem;
  background: #f6f8fa;
  border-radius: 6px;
}

.notebook .nb-cell {
  margin: 1rem 0;
}

.notebook .nb-output {
  border-left: 3px solid var(--border);
  padding-left: 0.75rem;
}

@media (max-width: 640px) {
  .hero {
    flex-direction: column;
    text-align: center;
  }

  .items.grid-2 {
    grid-template-columns: 1fr;
  }
}
"#;

const DEFAULT_JS: &str = r#"// lectern minimal theme

document.addEventListener('DOMContentLoaded', () => {
  document.querySelectorAll('.cite-button').forEach((button) => {
    button.addEventListener('click', async () => {
      const bibtex = button.getAttribute('data-bibtex') || '';
      try {
        await navigator.clipboard.writeText(bibtex);
        const label = button.textContent;
        button.textContent = 'Copied!';
        setTimeout(() => { button.textContent = label; }, 1500);
      } catch (err) {
        window.prompt('Copy the citation:', bibtex);
      }
    });
  });

  const search = document.getElementById('item-search');
  if (search) {
    search.addEventListener('input', () => {
      const query = search.value.trim().toLowerCase();
      document.querySelectorAll('[data-search]').forEach((item) => {
        const text = (item.getAttribute('data-search') + ' ' + item.textContent).toLowerCase();
        item.style.display = !query || text.includes(query) ? '' : 'none';
      });
      document.querySelectorAll('.item-group').forEach((group) => {
        const visible = group.querySelectorAll('[data-search]:not([style*="none"])').length;
        group.style.display = visible ? '' : 'none';
      });
    });
  }
});
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains(".hero"));
    }

    #[test]
    fn generates_js() {
        let js = AssetPipeline::generate_js();
        assert!(js.contains("addEventListener"));
        assert!(js.contains("clipboard"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::prepare_css(css, true);

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn builtin_stylesheet_minifies() {
        assert!(AssetPipeline::minify_css(DEFAULT_CSS).is_ok());
    }

    #[test]
    fn keeps_css_when_minify_disabled() {
        let css = "a {\n  color: red;\n}\n";
        assert_eq!(AssetPipeline::prepare_css(css, false), css);
    }

    #[test]
    fn copies_nested_directories() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("static");
        fs::create_dir_all(src.join("images")).unwrap();
        fs::write(src.join("cv.pdf"), "pdf").unwrap();
        fs::write(src.join("images").join("me.jpg"), "jpg").unwrap();

        let dest = temp.path().join("out").join("static");
        let copied = AssetPipeline::copy_dir(&src, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dest.join("images").join("me.jpg")).unwrap(), "jpg");
    }
}
