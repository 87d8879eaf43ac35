//! Posts and static sources.
//!
//! - `post` - `Post` and its YAML `FrontMatter`
//! - `source` - finding posts and mirroring resources
//! - `store` - `PostStore`, the loaded posts newest first

mod error;
mod post;
mod source;
mod store;

pub use error::ContentError;
pub use post::Post;
pub use source::{CopyStats, copy_resources, find_content};
pub use store::{PostStore, TagGroup};
