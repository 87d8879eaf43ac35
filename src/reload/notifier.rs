//! Live-reload notifier.
//!
//! Owns one open connection to the development server and reacts to the
//! single known event. The notifier is transport-agnostic: the connection is
//! a [`ReloadChannel`] and the reload effect is a [`PageHost`], so the same
//! state machine drives the native listener and the tests.
//!
//! ```text
//! Open --build_complete--> Reloading (terminal)
//!   ^                |
//!   +--other types---+   (logged, ignored)
//! ```

use super::error::ReloadError;
use super::message::{BUILD_COMPLETE, Notification, unhandled_message};

/// Normal closure status code.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close reason sent when reloading.
pub const CLOSE_REASON: &str = "Reloading page after receiving build_complete";

/// Endpoint the browser script connects to when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:5002/websocket";

/// The connection half owned by a notifier.
pub trait ReloadChannel {
    /// Close the connection with a status code and a human-readable reason.
    fn close(&mut self, code: u16, reason: &str) -> Result<(), ReloadError>;
}

/// The environment hosting the page.
pub trait PageHost {
    /// Reload the current page. `force` bypasses any cache.
    fn reload(&mut self, force: bool) -> Result<(), ReloadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Open,
    Reloading,
}

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Connection closed and reload triggered.
    Reloaded,
    /// Unknown type, logged and ignored.
    Ignored { kind: String },
    /// Notifier already reloading; message dropped.
    Discarded,
}

pub struct LiveReloadNotifier<C, H> {
    channel: C,
    host: H,
    state: NotifierState,
}

impl<C: ReloadChannel, H: PageHost> LiveReloadNotifier<C, H> {
    /// Wrap an already-open channel.
    pub fn new(channel: C, host: H) -> Self {
        Self {
            channel,
            host,
            state: NotifierState::Open,
        }
    }

    pub fn state(&self) -> NotifierState {
        self.state
    }

    pub fn is_reloading(&self) -> bool {
        self.state == NotifierState::Reloading
    }

    /// Handle one inbound text frame.
    pub fn on_message(&mut self, raw: &str) -> Result<Outcome, ReloadError> {
        if self.is_reloading() {
            crate::debug!("reload"; "dropping message after reload: {}", raw);
            return Ok(Outcome::Discarded);
        }

        match Notification::parse(raw)? {
            Notification::BuildComplete => {
                self.state = NotifierState::Reloading;
                // A dead socket must not keep the page from reloading
                if let Err(e) = self.channel.close(CLOSE_NORMAL, CLOSE_REASON) {
                    crate::debug!("reload"; "close failed: {}", e);
                }
                crate::log!("reload"; "Reloading page after receiving {}", BUILD_COMPLETE);
                self.host.reload(true)?;
                Ok(Outcome::Reloaded)
            }
            Notification::Unknown(kind) => {
                crate::log!("reload"; "{}", unhandled_message(&kind));
                Ok(Outcome::Ignored { kind })
            }
        }
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Give back the channel and host.
    pub fn into_parts(self) -> (C, H) {
        (self.channel, self.host)
    }
}
