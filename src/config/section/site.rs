//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Dustin Knopoff"
//! tagline = "rustacean, cook, and martial arts enthusiast"
//! url = "https://dustinknopoff.dev"
//! featured_tags = ["dev", "design"]
//! copyright = "Copyright 2020"
//!
//! [[site.links]]
//! label = "github"
//! href = "https://github.com/dustinknopoff"
//! ```

use serde::{Deserialize, Serialize};

/// Site metadata used by the layout and the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title, also the title of the index page.
    pub title: String,

    /// One-line description shown in the sidebar.
    pub tagline: String,

    /// Feed description.
    pub description: String,

    /// Public base URL. Required for the feed.
    pub url: Option<String>,

    /// Feed language code.
    pub language: String,

    /// Footer copyright line.
    pub copyright: String,

    /// Logo image shown in the sidebar.
    pub logo: Option<String>,

    /// Tags linked from the sidebar, in order.
    pub featured_tags: Vec<String>,

    /// Footer links.
    pub links: Vec<LinkConfig>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            title: "quire".into(),
            tagline: String::new(),
            description: String::new(),
            url: None,
            language: "en".into(),
            copyright: String::new(),
            logo: None,
            featured_tags: Vec::new(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub label: String,
    pub href: String,
}

impl SiteSectionConfig {
    /// Base URL without trailing slash.
    pub fn base_url(&self) -> Option<&str> {
        self.url.as_deref().map(|u| u.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_site_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.title, "quire");
        assert_eq!(config.site.language, "en");
        assert!(config.site.url.is_none());
        assert!(config.site.links.is_empty());
    }

    #[test]
    fn test_site_links_and_tags() {
        let config = test_parse_config(
            r#"
[site]
title = "Blog"
url = "https://example.com/"
featured_tags = ["dev", "design"]

[[site.links]]
label = "github"
href = "https://github.com/someone"
"#,
        );
        assert_eq!(config.site.title, "Blog");
        assert_eq!(config.site.base_url(), Some("https://example.com"));
        assert_eq!(config.site.featured_tags, vec!["dev", "design"]);
        assert_eq!(config.site.links[0].label, "github");
    }
}
