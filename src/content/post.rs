//! A single Markdown post and its YAML front matter.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ContentError;
use crate::utils::date::DateTimeUtc;

/// Post metadata between the leading `---` fences.
///
/// ```yaml
/// tags: [dev, rust]
/// title: Watching files
/// link: https://example.com/original
/// linkText: Read the original
/// date: 2018-06-26 08:31
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub tags: Vec<String>,
    pub title: String,
    /// External link shown under the title; empty for none.
    #[serde(default)]
    pub link: String,
    pub date: DateTimeUtc,
    #[serde(rename = "linkText", default)]
    pub link_text: Option<String>,
}

impl FrontMatter {
    /// The external link and its label, if the post has one.
    pub fn external_link(&self) -> Option<(&str, &str)> {
        let link = self.link.trim();
        if link.is_empty() {
            return None;
        }
        let text = self
            .link_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(link);
        Some((link, text))
    }
}

#[derive(Debug, Clone)]
pub struct Post {
    pub front: FrontMatter,
    /// Markdown after the front matter
    pub body: String,
    pub path: PathBuf,
    /// File stem, also the output file name
    pub stem: String,
}

impl Post {
    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let text =
            fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self, ContentError> {
        let (matter, body) = split_front_matter(text)
            .ok_or_else(|| ContentError::MissingFrontMatter(path.to_path_buf()))?;
        let front: FrontMatter = serde_yaml::from_str(matter)
            .map_err(|e| ContentError::FrontMatter(path.to_path_buf(), e))?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            front,
            body: body.to_owned(),
            path: path.to_path_buf(),
            stem,
        })
    }

    /// Site URL of the rendered page, e.g. `/posts/hello.html`.
    pub fn url(&self, posts_url: &str) -> String {
        format!("{posts_url}/{}.html", self.stem)
    }

    /// Output file name inside the posts directory.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.stem)
    }
}

/// Split `---\n<yaml>\n---\n<body>` into its two parts.
///
/// The opening fence must be the first line; the closing fence is the next
/// line consisting only of `---`.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "---\ntags: [dev, design]\ntitle: Hello\nlink: https://example.com\nlinkText: Elsewhere\ndate: 2020-05-03 10:15\n---\n# Hi\n\nBody text.\n";

    #[test]
    fn test_parse_post() {
        let post = Post::parse(Path::new("content/hello.md"), HELLO).unwrap();
        assert_eq!(post.front.title, "Hello");
        assert_eq!(post.front.tags, ["dev", "design"]);
        assert_eq!(post.front.date.to_string(), "2020-05-03 10:15");
        assert_eq!(
            post.front.external_link(),
            Some(("https://example.com", "Elsewhere"))
        );
        assert_eq!(post.body, "# Hi\n\nBody text.\n");
        assert_eq!(post.stem, "hello");
        assert_eq!(post.url("/posts"), "/posts/hello.html");
    }

    #[test]
    fn test_link_text_defaults_to_link() {
        let text = "---\ntitle: T\nlink: https://a.dev\ndate: 2020-05-03 10:15\n---\n";
        let post = Post::parse(Path::new("a.md"), text).unwrap();
        assert_eq!(post.front.external_link(), Some(("https://a.dev", "https://a.dev")));

        let text = "---\ntitle: T\nlink: ''\ndate: 2020-05-03 10:15\n---\n";
        let post = Post::parse(Path::new("a.md"), text).unwrap();
        assert_eq!(post.front.external_link(), None);
        assert!(post.front.tags.is_empty());
    }

    #[test]
    fn test_missing_front_matter() {
        let err = Post::parse(Path::new("broken.md"), "# Just markdown\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingFrontMatter(_)));

        // Unterminated block
        let err = Post::parse(Path::new("broken.md"), "---\ntitle: T\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingFrontMatter(_)));
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let text = "---\ntitle: T\ndate: 26/06/2018\n---\n";
        let err = Post::parse(Path::new("bad.md"), text).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter(..)));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_required_fields() {
        let text = "---\ntags: [dev]\n---\nbody\n";
        assert!(matches!(
            Post::parse(Path::new("a.md"), text),
            Err(ContentError::FrontMatter(..))
        ));
    }

    #[test]
    fn test_split_front_matter_crlf() {
        let text = "---\r\ntitle: T\r\n---\r\nbody";
        assert_eq!(split_front_matter(text), Some(("title: T\r\n", "body")));
        assert_eq!(split_front_matter("---\n---\n"), Some(("", "")));
        assert_eq!(split_front_matter("--- \nx\n---\n"), None);
    }
}
