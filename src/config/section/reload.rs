//! `[reload]` section configuration.
//!
//! The WebSocket endpoint pages connect to for `build_complete` events.
//!
//! ```toml
//! [reload]
//! host = "localhost"   # Address the WebSocket binds and the page script uses
//! port = 5002          # First port tried by the broadcaster
//! path = "/websocket"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5002,
            path: "/websocket".into(),
        }
    }
}

impl ReloadConfig {
    /// Endpoint URL for the configured port.
    pub fn url(&self) -> String {
        self.url_with_port(self.port)
    }

    /// Endpoint URL for the port actually bound.
    pub fn url_with_port(&self, port: u16) -> String {
        format!("ws://{}:{}{}", self.host, port, self.path)
    }
}
