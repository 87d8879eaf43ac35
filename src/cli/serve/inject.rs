//! Live reload script injection for served HTML.

use crate::embed::serve::LIVERELOAD_TAG;
use crate::utils::html::inject_before_body_end;
use crate::utils::mime::is_html;

/// Add the livereload `<script>` tag to HTML bodies when enabled.
///
/// Non-UTF-8 bodies are served untouched.
pub fn maybe_inject_livereload(body: Vec<u8>, content_type: &str, enabled: bool) -> Vec<u8> {
    if !enabled || !is_html(content_type) {
        return body;
    }
    match String::from_utf8(body) {
        Ok(html) => inject_before_body_end(&html, LIVERELOAD_TAG).into_bytes(),
        Err(e) => e.into_bytes(),
    }
}
