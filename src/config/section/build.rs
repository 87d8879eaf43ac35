//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"       # Markdown posts
//! resources = "resources"   # Copied verbatim into the output
//! output = "public"
//! posts = "posts"           # Post pages subdirectory of output
//! recent = 5                # Posts previewed on the index
//!
//! [build.feed]
//! enable = true
//! path = "rss.xml"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    pub content: PathBuf,
    pub resources: PathBuf,
    pub output: PathBuf,
    /// Subdirectory of `output` for post pages; also their URL prefix.
    pub posts: PathBuf,
    /// Number of posts previewed on the index page.
    pub recent: usize,
    pub feed: FeedConfig,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            resources: "resources".into(),
            output: "public".into(),
            posts: "posts".into(),
            recent: 5,
            feed: FeedConfig::default(),
            clean: false,
        }
    }
}

impl BuildSectionConfig {
    /// Directory the post pages are written to.
    pub fn posts_dir(&self) -> PathBuf {
        self.output.join(&self.posts)
    }

    /// URL prefix of post pages, e.g. `/posts`.
    pub fn posts_url(&self) -> String {
        let parts: Vec<_> = self
            .posts
            .iter()
            .filter_map(|c| c.to_str())
            .filter(|s| !s.is_empty() && *s != "/")
            .collect();
        if parts.is_empty() {
            String::new()
        } else {
            format!("/{}", parts.join("/"))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Enable RSS generation (also needs `site.url`).
    pub enable: bool,
    /// Output path relative to the output directory.
    pub path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "rss.xml".into(),
        }
    }
}
