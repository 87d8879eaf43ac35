//! Live Reload Message Protocol
//!
//! JSON text frames exchanged between the development server and pages.
//!
//! # Message Types
//!
//! - `build_complete`: a rebuild finished, the page should reload
//!
//! The server only ever sends `build_complete`. Listeners must tolerate any
//! other `type` value, so inbound frames are parsed into [`Notification`],
//! which keeps unknown types instead of rejecting them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ReloadError;

/// Tag of the only actionable notification.
pub const BUILD_COMPLETE: &str = "build_complete";

/// Event sent by the server over WebSocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Site rebuilt successfully
    BuildComplete,
}

impl ServerEvent {
    /// Serialize to JSON string
    pub fn to_json(self) -> String {
        serde_json::to_string(&self)
            .unwrap_or_else(|_| format!(r#"{{"type":"{BUILD_COMPLETE}"}}"#))
    }
}

/// Notification received by a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// `{"type":"build_complete"}`
    BuildComplete,
    /// Any other `type`, kept in display form for diagnostics.
    Unknown(String),
}

impl Notification {
    /// Parse a raw text frame.
    ///
    /// Malformed JSON and a bare `null` are errors. Any other document with a
    /// missing or unexpected `type` is a [`Notification::Unknown`].
    pub fn parse(raw: &str) -> Result<Self, ReloadError> {
        let value: Value = serde_json::from_str(raw)?;
        if value.is_null() {
            return Err(ReloadError::NullNotification);
        }
        // Only the `type` field matters; non-object documents have none.
        Ok(match value.get("type") {
            Some(Value::String(s)) if s == BUILD_COMPLETE => Self::BuildComplete,
            Some(Value::String(s)) => Self::Unknown(s.clone()),
            Some(Value::Null) => Self::Unknown("null".to_string()),
            Some(other) => Self::Unknown(other.to_string()),
            None => Self::Unknown("undefined".to_string()),
        })
    }

    /// Whether this notification triggers a reload.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::BuildComplete)
    }
}

/// Diagnostic logged for notifications the listener does not handle.
pub fn unhandled_message(kind: &str) -> String {
    format!("Don't know how to handle type '{kind}'")
}
