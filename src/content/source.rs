//! Walking the content and resources directories.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use super::ContentError;
use crate::utils::output::write_if_changed;

/// Result of mirroring the resources directory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub unchanged: usize,
}

/// Every `*.md` file under `dir`, skipping hidden entries, in sorted order.
///
/// A missing directory yields no posts.
pub fn find_content(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    Ok(walk_files(dir)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect())
}

/// Copy every non-hidden file under `dir` to the same relative path under
/// `output`, byte for byte.
pub fn copy_resources(dir: &Path, output: &Path) -> Result<CopyStats, ContentError> {
    let mut stats = CopyStats::default();

    for src in walk_files(dir)? {
        let Ok(rel) = src.strip_prefix(dir) else {
            continue;
        };
        let bytes = fs::read(&src).map_err(|e| ContentError::Io(src.clone(), e))?;
        let dest = output.join(rel);
        if write_if_changed(&dest, &bytes).map_err(|e| ContentError::Io(dest, e))? {
            stats.copied += 1;
        } else {
            stats.unchanged += 1;
        }
    }

    Ok(stats)
}

/// Sorted non-hidden files under `dir`.
///
/// Serial, since builds call this from inside a rayon worker where jwalk's
/// parallel mode yields no entries.
fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.is_dir() {
        crate::debug!("content"; "{} does not exist, skipping", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .skip_hidden(true)
        .parallelism(Parallelism::Serial)
    {
        let entry = entry.map_err(|e| ContentError::Walk(dir.to_path_buf(), e))?;
        if entry.file_type().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_find_content_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("b.md"), "");
        touch(&root.join("a.md"), "");
        touch(&root.join("2020/c.md"), "");
        touch(&root.join("notes.txt"), "");
        touch(&root.join(".draft.md"), "");
        touch(&root.join(".hidden/d.md"), "");

        let found = find_content(root).unwrap();
        let rel: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("2020/c.md"),
                PathBuf::from("a.md"),
                PathBuf::from("b.md")
            ]
        );
    }

    #[test]
    fn test_find_content_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_content(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_walks_inside_rayon_pool() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        let resources = dir.path().join("resources");
        touch(&content.join("post.md"), "");
        touch(&resources.join("style.css"), "");

        let (posts, copied) = rayon::join(
            || find_content(&content),
            || copy_resources(&resources, &dir.path().join("public")),
        );
        assert_eq!(posts.unwrap().len(), 1);
        assert_eq!(copied.unwrap().copied, 1);
    }

    #[test]
    fn test_copy_resources_preserves_layout() {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join("resources");
        let output = dir.path().join("public");
        touch(&resources.join("style.css"), "body {}");
        touch(&resources.join("img/logo.svg"), "<svg/>");
        touch(&resources.join(".secret"), "x");
        fs::create_dir_all(&resources).unwrap();
        fs::write(resources.join("blob.bin"), [0u8, 159, 146, 150]).unwrap();

        let stats = copy_resources(&resources, &output).unwrap();
        assert_eq!(stats, CopyStats { copied: 3, unchanged: 0 });
        assert_eq!(fs::read_to_string(output.join("img/logo.svg")).unwrap(), "<svg/>");
        assert_eq!(fs::read(output.join("blob.bin")).unwrap(), [0u8, 159, 146, 150]);
        assert!(!output.join(".secret").exists());

        let stats = copy_resources(&resources, &output).unwrap();
        assert_eq!(stats, CopyStats { copied: 0, unchanged: 3 });
    }
}
