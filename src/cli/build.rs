//! Site building.
//!
//! Phases:
//! - **Init** - optional clean, create the output directory
//! - **Collect** - copy resources and load posts (in parallel)
//! - **Render** - post pages, index, tag pages, feed
//!
//! Every output goes through `write_if_changed`, so a rebuild only touches
//! files whose bytes differ.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use crate::config::SiteConfig;
use crate::content::{CopyStats, PostStore, copy_resources, find_content};
use crate::log;
use crate::render::{PageRenderer, build_rss};
use crate::utils::output::write_if_changed;
use crate::utils::plural::plural_count;

/// What a build did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub tags: usize,
    /// Generated files written (content differed)
    pub written: usize,
    /// Generated files left alone (content identical)
    pub unchanged: usize,
    pub resources: CopyStats,
    pub feed: bool,
}

impl BuildReport {
    fn record(&mut self, written: bool) {
        if written {
            self.written += 1;
        } else {
            self.unchanged += 1;
        }
    }
}

/// `quire build`
pub fn run(config: &SiteConfig) -> Result<()> {
    if config.build.clean {
        clean_output(config)?;
    }
    let report = build_site(config)?;
    log!("build"; "{}", summary(&report));
    log!("build"; "output: {}", config.root_relative(&config.build.output).display());
    Ok(())
}

/// Build the whole site into `build.output`.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let (copied, store) = rayon::join(
        || copy_resources(&config.build.resources, output),
        || find_content(&config.build.content).and_then(|paths| PostStore::load(&paths)),
    );
    let mut report = BuildReport {
        resources: copied?,
        ..BuildReport::default()
    };
    let store = store?;
    report.posts = store.len();
    crate::debug!("build"; "loaded {}", plural_count(store.len(), "post"));

    let renderer = PageRenderer::new(config);
    let posts_dir = config.build.posts_dir();

    let posts: Vec<_> = store.iter().collect();
    let written = posts
        .par_iter()
        .map(|post| write_page(&posts_dir.join(post.file_name()), &renderer.post(post)))
        .collect::<Result<Vec<_>>>()?;
    written.into_iter().for_each(|w| report.record(w));

    report.record(write_page(
        &output.join("index.html"),
        &renderer.index(store.most_recent(config.build.recent)),
    )?);

    let tags = store.tags();
    report.tags = tags.len();
    let tags_dir = output.join("tags");
    report.record(write_page(&tags_dir.join("index.html"), &renderer.tags_index(&tags))?);
    for tag in &tags {
        let path = tags_dir.join(&tag.slug).join("index.html");
        report.record(write_page(&path, &renderer.tag(tag))?);
    }

    if let Some(xml) = build_rss(config, &store)? {
        report.record(write_page(&output.join(&config.build.feed.path), &xml)?);
        report.feed = true;
    }

    Ok(report)
}

/// Remove the output directory, refusing paths that hold the sources.
pub fn clean_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    let guarded: [&Path; 3] = [
        config.get_root(),
        &config.build.content,
        &config.build.resources,
    ];
    if let Some(path) = guarded.iter().find(|p| p.starts_with(output)) {
        bail!(
            "refusing to clean {}: it contains {}",
            output.display(),
            path.display()
        );
    }

    match fs::remove_dir_all(output) {
        Ok(()) => {
            crate::debug!("build"; "removed {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to clean {}", output.display())),
    }
}

fn write_page(path: &Path, html: &str) -> Result<bool> {
    write_if_changed(path, html.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))
}

pub(super) fn summary(report: &BuildReport) -> String {
    let mut line = format!(
        "{}, {} ({} written, {} unchanged)",
        plural_count(report.posts, "post"),
        plural_count(report.tags, "tag"),
        report.written,
        report.unchanged
    );
    if report.resources.copied > 0 {
        line.push_str(&format!(", {} copied", plural_count(report.resources.copied, "resource")));
    }
    if report.feed {
        line.push_str(", rss");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use tempfile::TempDir;

    const HELLO: &str = "---\ntags: [dev, Web Design]\ntitle: Hello\nlink: ''\ndate: 2020-05-03 10:15\n---\nHi there.\n";
    const OLDER: &str = "---\ntags: [dev]\ntitle: Older\nlink: https://example.com\ndate: 2019-01-01 09:00\n---\nEarlier.\n";

    fn site(extra: &str) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), extra);
        let content = &config.build.content;
        fs::create_dir_all(content.join("2019")).unwrap();
        fs::write(content.join("hello.md"), HELLO).unwrap();
        fs::write(content.join("2019/older.md"), OLDER).unwrap();
        fs::create_dir_all(&config.build.resources).unwrap();
        fs::write(config.build.resources.join("style.css"), "main {}").unwrap();
        (dir, config)
    }

    #[test]
    fn test_build_site_layout() {
        let (_dir, config) = site("");
        let report = build_site(&config).unwrap();
        let out = &config.build.output;

        assert_eq!(report.posts, 2);
        assert_eq!(report.tags, 2);
        assert!(!report.feed);
        assert_eq!(report.resources.copied, 1);
        // 2 posts + index + tags index + 2 tag pages
        assert_eq!(report.written, 6);

        assert!(out.join("posts/hello.html").is_file());
        assert!(out.join("posts/older.html").is_file());
        assert!(out.join("tags/index.html").is_file());
        assert!(out.join("tags/dev/index.html").is_file());
        assert!(out.join("tags/web-design/index.html").is_file());
        assert!(!out.join("rss.xml").exists());
        assert_eq!(fs::read_to_string(out.join("style.css")).unwrap(), "main {}");

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        let hello = index.find("/posts/hello.html").unwrap();
        let older = index.find("/posts/older.html").unwrap();
        assert!(hello < older);
        assert!(!index.contains("livereload"));
    }

    #[test]
    fn test_rebuild_skips_unchanged() {
        let (_dir, config) = site("");
        build_site(&config).unwrap();

        let report = build_site(&config).unwrap();
        assert_eq!(report.written, 0);
        assert_eq!(report.unchanged, 6);
        assert_eq!(report.resources.unchanged, 1);

        fs::write(
            config.build.content.join("hello.md"),
            HELLO.replace("Hi there.", "Changed."),
        )
        .unwrap();
        let report = build_site(&config).unwrap();
        // the post page and the two tag pages previewing it, plus the index
        assert_eq!(report.written, 4);
    }

    #[test]
    fn test_recent_limit_and_feed() {
        let (_dir, config) = site(
            "[site]\nurl = \"https://example.com\"\n[build]\nrecent = 1\n",
        );
        let report = build_site(&config).unwrap();
        assert!(report.feed);

        let out = &config.build.output;
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("/posts/hello.html"));
        assert!(!index.contains("/posts/older.html"));

        let rss = fs::read_to_string(out.join("rss.xml")).unwrap();
        assert!(rss.contains("https://example.com/posts/older.html"));
    }

    #[test]
    fn test_bad_post_fails_build() {
        let (_dir, config) = site("");
        fs::write(config.build.content.join("broken.md"), "no front matter").unwrap();
        let err = build_site(&config).unwrap_err();
        assert!(format!("{err:#}").contains("broken.md"));
    }

    #[test]
    fn test_clean_output() {
        let (_dir, config) = site("");
        build_site(&config).unwrap();
        clean_output(&config).unwrap();
        assert!(!config.build.output.exists());
        // Nothing to remove is fine
        clean_output(&config).unwrap();
    }

    #[test]
    fn test_clean_refuses_source_ancestor() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "[build]\noutput = \".\"\n");
        assert!(clean_output(&config).is_err());
        assert!(dir.path().exists());
    }
}
