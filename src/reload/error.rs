//! Live reload error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("notification is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("notification is `null`")]
    NullNotification,

    #[error("websocket error")]
    Socket(#[from] tungstenite::Error),

    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    #[error("invalid reload url `{0}`")]
    Url(String),

    #[error("reload action failed: {0}")]
    Host(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}
