//! HTML and feed rendering.
//!
//! - `markdown` - post bodies and preview blurbs (pulldown-cmark)
//! - `layout` - shared document chrome
//! - `pages` - post, index and tag pages
//! - `feed` - RSS 2.0

mod feed;
mod layout;
pub mod markdown;
mod pages;

pub use feed::build_rss;
pub use pages::PageRenderer;
