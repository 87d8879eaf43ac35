//! Actor System for Live Reload
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor --> BuildActor --> WsActor
//! (watch)     (rebuild)    (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `build` - Site rebuild on change
//! - `ws` - WebSocket clients and `build_complete` broadcast
//! - `coordinator` - Wires up and runs actors

pub mod build;
pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
