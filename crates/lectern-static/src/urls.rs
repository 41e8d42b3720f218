//! Path and URL resolution.
//!
//! A base URL is either absolute (`https://...`, used for deployment), empty
//! (site root, used for local preview) or a relative prefix such as `../`
//! for nested pages.

use std::sync::OnceLock;

use regex::{Captures, Regex};

const EXTERNAL_PREFIXES: &[&str] = &["http://", "https://", "mailto:", "tel:"];

/// Whether a path points outside the site.
pub fn is_external_url(path: &str) -> bool {
    EXTERNAL_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn is_absolute_base(base_url: &str) -> bool {
    base_url.starts_with("http://") || base_url.starts_with("https://")
}

/// Resolve a content path. External URLs pass through; local paths lose a
/// leading `static/` and are left for the theme to anchor.
pub fn resolve_path(path: &str) -> String {
    if is_external_url(path) {
        return path.to_string();
    }
    path.strip_prefix("static/").unwrap_or(path).to_string()
}

/// Join a base URL and a site path.
pub fn build_url(base_url: &str, path: &str) -> String {
    let clean = path.trim_start_matches('/');

    if is_absolute_base(base_url) {
        return format!("{}/{}", base_url.trim_end_matches('/'), clean);
    }

    if base_url.is_empty() || base_url == "./" {
        return clean.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if clean.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, clean)
    }
}

/// Base URL for a page nested `depth` directories below the site root.
pub fn relative_base(base_url: &str, depth: usize) -> String {
    if is_absolute_base(base_url) {
        return base_url.to_string();
    }

    let up = "../".repeat(depth);
    if base_url.is_empty() || base_url == "./" {
        up
    } else {
        format!("{}{}", up, base_url.trim_start_matches("./"))
    }
}

fn img_src_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"src="([^"]+)""#).expect("valid regex"))
}

/// Point `{static}` placeholders and `images/...` sources at the static directory.
pub fn process_static_placeholders(content: &str, base_url: &str) -> String {
    let content = if content.contains("{static}") {
        content.replace("{static}", &build_url(base_url, "static"))
    } else {
        content.to_string()
    };

    img_src_pattern()
        .replace_all(&content, |caps: &Captures| {
            let src = &caps[1];
            let skip = ["http://", "https://", "//", "../", "data:", "static/"]
                .iter()
                .any(|prefix| src.starts_with(prefix));
            if !skip && src.starts_with("images/") {
                format!("src=\"{}\"", build_url(base_url, &format!("static/{}", src)))
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_keeps_external_urls() {
        assert_eq!(resolve_path("https://x.com/y"), "https://x.com/y");
        assert_eq!(resolve_path("mailto:ada@example.com"), "mailto:ada@example.com");
    }

    #[test]
    fn resolve_path_strips_static_prefix() {
        assert_eq!(resolve_path("static/img.png"), "img.png");
        assert_eq!(resolve_path("img.png"), "img.png");
        assert_eq!(resolve_path("papers/static/a.pdf"), "papers/static/a.pdf");
    }

    #[test]
    fn build_url_handles_each_base_kind() {
        assert_eq!(build_url("https://ada.dev", "/blog/a.html"), "https://ada.dev/blog/a.html");
        assert_eq!(build_url("https://ada.dev/", "index.html"), "https://ada.dev/index.html");
        assert_eq!(build_url("", "static/style.css"), "static/style.css");
        assert_eq!(build_url("./", "index.html"), "index.html");
        assert_eq!(build_url("../", "static/style.css"), "../static/style.css");
    }

    #[test]
    fn relative_base_climbs_directories() {
        assert_eq!(relative_base("", 1), "../");
        assert_eq!(relative_base("./", 2), "../../");
        assert_eq!(relative_base("https://ada.dev", 1), "https://ada.dev");
        assert_eq!(relative_base("site/", 1), "../site/");
    }

    #[test]
    fn rewrites_static_placeholders_and_image_sources() {
        let html = r#"<img src="{static}/a.png"><img src="images/b.png"><img src="https://x/c.png">"#;

        let out = process_static_placeholders(html, "../");

        assert_eq!(
            out,
            r#"<img src="../static/a.png"><img src="../static/images/b.png"><img src="https://x/c.png">"#
        );
    }
}
