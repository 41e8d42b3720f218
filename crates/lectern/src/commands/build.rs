//! Static site build command.

use std::path::Path;

use lectern_static::build_site;

/// Run the build command. Returns whether the site was built.
pub fn run(
    content_dir: &Path,
    theme: Option<&str>,
    base_url: Option<&str>,
    dev: bool,
    debug: bool,
) -> bool {
    tracing::info!("Building static site...");

    if dev && base_url.is_some() {
        tracing::warn!("--dev ignores --base-url; links will be relative");
    }

    build_site(content_dir, theme, debug, base_url, dev)
}
