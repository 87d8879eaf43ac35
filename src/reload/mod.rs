//! Reload Module
//!
//! The `build_complete` live-reload loop.
//!
//! # Architecture
//!
//! ```text
//! FsActor -> Coordinator (rebuild) -> WsActor --{"type":"build_complete"}--> pages
//!                                                                             |
//!                                 LiveReloadNotifier (browser script / listen)
//! ```
//!
//! # Modules
//!
//! - `message` - wire format (`ServerEvent`, `Notification`)
//! - `notifier` - listener state machine
//! - `client` - native WebSocket listener
//! - `host` - reload effects for the native listener
//! - `server` - acceptor for page connections

pub mod client;
pub mod error;
pub mod host;
pub mod message;
pub mod notifier;
pub mod server;

pub use error::ReloadError;
