//! Loaded posts, ordered newest first.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::{ContentError, Post};
use crate::utils::slug::slugify;

/// Posts sharing one tag page.
#[derive(Debug)]
pub struct TagGroup<'a> {
    /// Display name (first spelling seen, newest post first)
    pub name: &'a str,
    pub slug: String,
    /// Newest first
    pub posts: Vec<&'a Post>,
}

#[derive(Debug, Default)]
pub struct PostStore {
    /// Newest first; equal dates fall back to the file stem
    posts: Vec<Post>,
}

impl PostStore {
    /// Parse every path in parallel.
    ///
    /// The first failure in path order is returned, so the error a user
    /// sees does not depend on thread scheduling.
    pub fn load(paths: &[PathBuf]) -> Result<Self, ContentError> {
        let results: Vec<_> = paths.par_iter().map(|p| Post::from_path(p)).collect();
        let posts = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Self::from_posts(posts)
    }

    pub fn from_posts(mut posts: Vec<Post>) -> Result<Self, ContentError> {
        let mut seen: FxHashMap<&str, &Post> = FxHashMap::default();
        for post in &posts {
            if let Some(first) = seen.insert(&post.stem, post) {
                return Err(ContentError::DuplicateStem {
                    stem: post.stem.clone(),
                    first: first.path.clone(),
                    second: post.path.clone(),
                });
            }
        }

        posts.sort_by(|a, b| {
            b.front
                .date
                .cmp(&a.front.date)
                .then_with(|| a.stem.cmp(&b.stem))
        });
        Ok(Self { posts })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All posts, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    /// At most `n` posts, newest first.
    pub fn most_recent(&self, n: usize) -> &[Post] {
        &self.posts[..n.min(self.posts.len())]
    }

    /// Tags sorted by name, each with its posts newest first.
    ///
    /// Tags that slugify to the same path ("Web Design", "web design")
    /// share one group.
    pub fn tags(&self) -> Vec<TagGroup<'_>> {
        let mut groups: BTreeMap<String, TagGroup<'_>> = BTreeMap::new();

        for post in &self.posts {
            for tag in &post.front.tags {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                let slug = slugify(tag);
                let group = groups.entry(slug.clone()).or_insert_with(|| TagGroup {
                    name: tag,
                    slug,
                    posts: Vec::new(),
                });
                // A post listing a tag twice appears once
                if !group.posts.iter().any(|p| std::ptr::eq(*p, post)) {
                    group.posts.push(post);
                }
            }
        }

        let mut tags: Vec<_> = groups.into_values().collect();
        tags.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn post(stem: &str, date: &str, tags: &[&str]) -> Post {
        let text = format!(
            "---\ntitle: {stem}\ntags: [{}]\ndate: {date}\n---\nbody of {stem}\n",
            tags.join(", ")
        );
        Post::parse(Path::new(&format!("content/{stem}.md")), &text).unwrap()
    }

    fn store() -> PostStore {
        PostStore::from_posts(vec![
            post("old", "2018-01-01 00:00", &["dev"]),
            post("new", "2020-06-01 12:00", &["dev", "Design"]),
            post("mid", "2019-03-15 08:30", &["design", "dev", "dev"]),
        ])
        .unwrap()
    }

    fn stems(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.stem.as_str()).collect()
    }

    #[test]
    fn test_most_recent_newest_first() {
        let store = store();
        assert_eq!(stems(store.most_recent(2)), ["new", "mid"]);
        assert_eq!(stems(store.most_recent(5)), ["new", "mid", "old"]);
        assert!(store.most_recent(0).is_empty());
        assert!(PostStore::default().most_recent(5).is_empty());
    }

    #[test]
    fn test_tags_grouped_and_sorted() {
        let store = store();
        let tags = store.tags();
        let summary: Vec<_> = tags
            .iter()
            .map(|t| {
                (
                    t.name,
                    t.slug.as_str(),
                    t.posts.iter().map(|p| p.stem.as_str()).collect::<Vec<_>>(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Design", "design", vec!["new", "mid"]),
                ("dev", "dev", vec!["new", "mid", "old"]),
            ]
        );
    }

    #[test]
    fn test_duplicate_stem_rejected() {
        let mut a = post("same", "2020-01-01 00:00", &[]);
        a.path = "content/2020/same.md".into();
        let b = post("same", "2021-01-01 00:00", &[]);
        let err = PostStore::from_posts(vec![a, b]).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateStem { .. }));
    }

    #[test]
    fn test_load_reports_failing_path() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.md");
        let bad = dir.path().join("bad.md");
        fs::write(&good, "---\ntitle: Good\ndate: 2020-01-01 00:00\n---\n").unwrap();
        fs::write(&bad, "no front matter\n").unwrap();

        let err = PostStore::load(&[good.clone(), bad]).unwrap_err();
        assert!(err.to_string().contains("bad.md"));

        let store = PostStore::load(&[good]).unwrap();
        assert_eq!(store.len(), 1);
    }
}
