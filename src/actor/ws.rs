//! WebSocket Actor - build_complete broadcast
//!
//! ```text
//! acceptor --AddClient--> WsActor --{"type":"build_complete"}--> pages
//!                            ^
//! BuildActor --BuildComplete-+
//! ```
//!
//! Pages never send anything the server acts on; inbound frames are read
//! only to notice closed connections.

use std::net::TcpStream;
use std::time::Duration;

use tokio::sync::mpsc;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::protocol::frame::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::protocol::Message;
use tungstenite::{WebSocket, http::StatusCode};

use super::messages::WsMsg;
use crate::reload::ReloadError;
use crate::reload::message::ServerEvent;
use crate::reload::notifier::CLOSE_NORMAL;

/// How long a new connection gets to send its upgrade request.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// A page that stops reading is dropped after this long.
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Connected pages.
pub struct ClientRegistry {
    /// Only upgrade requests for this path are accepted
    path: String,
    clients: Vec<WebSocket<TcpStream>>,
}

impl ClientRegistry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            clients: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Perform the handshake and keep the client.
    ///
    /// Requests for any other path are answered with 404. A peer that
    /// stays silent fails after `HANDSHAKE_TIMEOUT`.
    pub fn accept(&mut self, stream: TcpStream) -> Result<(), ReloadError> {
        stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;
        stream.set_write_timeout(Some(WRITE_TIMEOUT))?;

        let expected = self.path.clone();
        let check_path = move |req: &Request, resp: Response| {
            if req.uri().path() == expected {
                Ok(resp)
            } else {
                let mut err = ErrorResponse::new(Some("not found".into()));
                *err.status_mut() = StatusCode::NOT_FOUND;
                Err(err)
            }
        };

        let ws = tungstenite::accept_hdr(stream, check_path)
            .map_err(|e| ReloadError::Handshake(e.to_string()))?;
        self.clients.push(ws);
        crate::debug!("ws"; "client connected (total: {})", self.clients.len());
        Ok(())
    }

    /// Send `event` to every client, dropping those whose write fails.
    ///
    /// Returns the number of clients that received it.
    pub fn broadcast(&mut self, event: &ServerEvent) -> usize {
        self.prune();
        if self.clients.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return 0;
        }

        let text = event.to_json();
        self.clients.retain_mut(|ws| {
            match ws.send(Message::Text(text.clone().into())) {
                Ok(()) => true,
                Err(e) => {
                    crate::debug!("ws"; "client disconnected: {}", e);
                    false
                }
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", self.clients.len());
        self.clients.len()
    }

    /// Drop clients that closed their side.
    ///
    /// Reads whatever is pending without blocking; pages send nothing
    /// meaningful, so any frame other than Close is discarded.
    pub fn prune(&mut self) {
        self.clients.retain_mut(|ws| {
            if ws.get_ref().set_nonblocking(true).is_err() {
                return false;
            }
            let alive = loop {
                match ws.read() {
                    Ok(Message::Close(_)) => break false,
                    Ok(_) => continue,
                    Err(tungstenite::Error::Io(ref e))
                        if e.kind() == std::io::ErrorKind::WouldBlock =>
                    {
                        break true;
                    }
                    Err(_) => break false,
                }
            };
            alive && ws.get_ref().set_nonblocking(false).is_ok()
        });
    }

    /// Close every client with a normal closure.
    pub fn close_all(&mut self) {
        for mut ws in self.clients.drain(..) {
            let frame = CloseFrame {
                code: CloseCode::from(CLOSE_NORMAL),
                reason: "server shutting down".into(),
            };
            let _ = ws.close(Some(frame));
            // Flush the close frame; the peer's reply is not awaited
            let _ = ws.flush();
        }
    }
}

/// WebSocket Actor - owns the registry
pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    registry: ClientRegistry,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>, path: impl Into<String>) -> Self {
        Self {
            rx,
            registry: ClientRegistry::new(path),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::AddClient(stream) => {
                    // Handshake is blocking; keep it off the async workers
                    let registry = &mut self.registry;
                    if let Err(e) = tokio::task::block_in_place(|| registry.accept(stream)) {
                        crate::debug!("ws"; "{}", e);
                    }
                }
                WsMsg::BuildComplete => {
                    let registry = &mut self.registry;
                    let sent =
                        tokio::task::block_in_place(|| registry.broadcast(&ServerEvent::BuildComplete));
                    crate::debug!("ws"; "build_complete sent to {} pages", sent);
                }
                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    self.registry.close_all();
                    break;
                }
            }
        }
    }
}
