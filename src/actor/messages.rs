//! Actor Message Definitions
//!
//! ```text
//! FsActor --Rebuild--> BuildActor --BuildComplete--> WsActor
//! ```

use std::path::PathBuf;

/// Messages to the build actor
#[derive(Debug)]
pub enum BuildMsg {
    /// Rebuild the site after a debounced batch of changes
    Rebuild {
        changed: Vec<PathBuf>,
        /// The config file is among the changes; reload it first
        config_changed: bool,
    },
    /// Shutdown
    Shutdown,
}

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Accepted TCP connection, not yet upgraded
    AddClient(std::net::TcpStream),
    /// Tell every page a rebuild finished
    BuildComplete,
    /// Close all clients and stop
    Shutdown,
}
