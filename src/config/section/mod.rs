//! Configuration section definitions.
//!
//! Each module corresponds to a section in `quire.toml`:
//!
//! | Module   | TOML Section | Purpose                              |
//! |----------|--------------|--------------------------------------|
//! | `site`   | `[site]`     | Title, tagline, footer, feed url     |
//! | `build`  | `[build]`    | Source/output paths, index, feed     |
//! | `serve`  | `[serve]`    | Development HTTP server              |
//! | `reload` | `[reload]`   | Live-reload WebSocket endpoint       |

mod build;
mod reload;
mod serve;
mod site;

pub use build::{BuildSectionConfig, FeedConfig};
pub use reload::ReloadConfig;
pub use serve::ServeConfig;
pub use site::{LinkConfig, SiteSectionConfig};
