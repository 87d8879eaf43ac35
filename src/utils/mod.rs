//! Shared helpers with no knowledge of posts or pages.

pub mod date;
pub mod html;
pub mod mime;
pub mod output;
pub mod path;
pub mod plural;
pub mod slug;
