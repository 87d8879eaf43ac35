//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Dev server resources (livereload.js)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{LIVERELOAD_JS, LivereloadVars};
//!
//! let js = LIVERELOAD_JS.render(&LivereloadVars { ws_url: "ws://localhost:5002/websocket" });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the dev server answers with the script below.
    pub const LIVERELOAD_PATH: &str = "/livereload.js";

    /// Tag inserted into every served HTML page.
    pub const LIVERELOAD_TAG: &str = r#"<script src="/livereload.js"></script>"#;

    /// Variables for livereload.js.
    pub struct LivereloadVars<'a> {
        pub ws_url: &'a str,
    }

    impl TemplateVars for LivereloadVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__QUIRE_WS_URL__", self.ws_url)
        }
    }

    /// Browser listener for `build_complete`.
    pub const LIVERELOAD_JS: Template<LivereloadVars<'static>> =
        Template::new(include_str!("serve/livereload.js"));
}

#[cfg(test)]
mod tests {
    use super::serve::*;
    use crate::reload::notifier::{CLOSE_REASON, DEFAULT_ENDPOINT};

    #[test]
    fn test_livereload_renders_endpoint() {
        let js = LIVERELOAD_JS.render(&LivereloadVars {
            ws_url: DEFAULT_ENDPOINT,
        });
        assert!(js.contains(r#"new WebSocket("ws://localhost:5002/websocket")"#));
        assert!(!js.contains("__QUIRE_WS_URL__"));
    }

    #[test]
    fn test_livereload_matches_native_listener() {
        let js = LIVERELOAD_JS.content();
        assert!(js.contains(&format!(r#"socket.close(1000, "{CLOSE_REASON}")"#)));
        assert!(js.contains("location.reload(true)"));
        assert!(js.contains("Don't know how to handle type '"));
    }

    #[test]
    fn test_tag_points_at_script() {
        assert!(LIVERELOAD_TAG.contains(LIVERELOAD_PATH));
    }
}
