//! Request URL to output file.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Map a request URL onto a file under `serve_root`.
///
/// Tries, in order: the file itself, `<dir>/index.html`, and `<path>.html`
/// (so `/posts/hello` finds `posts/hello.html`). Anything that resolves
/// outside `serve_root` is rejected.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);
    if clean.split('/').any(|seg| seg == "..") {
        return None;
    }

    let root = serve_root.canonicalize().ok()?;
    let local = root.join(&clean);

    let mut candidates = vec![local.clone(), local.join("index.html")];
    if !clean.is_empty() && local.extension().is_none() {
        candidates.push(local.with_extension("html"));
    }

    candidates.into_iter().find_map(|candidate| {
        // Resolve symlinks before the containment check
        let canonical = candidate.canonicalize().ok()?;
        (canonical.starts_with(&root) && canonical.is_file()).then_some(canonical)
    })
}

/// Decode, drop query and fragment, trim slashes.
fn normalize_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}
