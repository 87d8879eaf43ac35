use std::path::PathBuf;

use thiserror::Error;

/// Errors loading posts and copying resources.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to walk {}", .0.display())]
    Walk(PathBuf, #[source] jwalk::Error),

    #[error("{} has no front matter (expected a leading `---` block)", .0.display())]
    MissingFrontMatter(PathBuf),

    #[error("invalid front matter in {}", .0.display())]
    FrontMatter(PathBuf, #[source] serde_yaml::Error),

    #[error("posts {} and {} both publish as `{stem}.html`", .first.display(), .second.display())]
    DuplicateStem {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },
}
