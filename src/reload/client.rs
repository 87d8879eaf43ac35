//! Native live-reload listener.
//!
//! Opens one WebSocket client connection and feeds every text frame to a
//! [`LiveReloadNotifier`]. There is no reconnection: a failed connect or a
//! malformed frame ends the listener with an error.

use std::net::TcpStream;
use std::time::Duration;

use tungstenite::protocol::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use super::error::ReloadError;
use super::notifier::{LiveReloadNotifier, Outcome, PageHost, ReloadChannel};

/// How long to wait for the server's side of the close handshake.
const CLOSE_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Client connection to the reload endpoint.
pub struct WsChannel {
    ws: WebSocket<MaybeTlsStream<TcpStream>>,
}

impl WsChannel {
    fn read(&mut self) -> Result<Message, tungstenite::Error> {
        self.ws.read()
    }

    /// Read until the connection is gone so the close handshake completes.
    fn drain(&mut self) {
        #[allow(unreachable_patterns)]
        match self.ws.get_mut() {
            MaybeTlsStream::Plain(stream) => {
                let _ = stream.set_read_timeout(Some(CLOSE_DRAIN_TIMEOUT));
            }
            _ => {}
        }
        while self.ws.read().is_ok() {}
    }
}

impl ReloadChannel for WsChannel {
    fn close(&mut self, code: u16, reason: &str) -> Result<(), ReloadError> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_string().into(),
        };
        match self.ws.close(Some(frame)) {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open the single connection to `url` (`ws://` or `wss://`).
pub fn connect(url: &str) -> Result<WsChannel, ReloadError> {
    let parsed = url::Url::parse(url).map_err(|_| ReloadError::Url(url.to_string()))?;
    if !matches!(parsed.scheme(), "ws" | "wss") {
        return Err(ReloadError::Url(url.to_string()));
    }

    let (ws, _response) = tungstenite::connect(url)?;
    crate::debug!("reload"; "connected to {}", url);
    Ok(WsChannel { ws })
}

/// Why a listener stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenEnd {
    /// A build finished and the host reloaded.
    Reloaded,
    /// The server went away first.
    ServerClosed,
}

/// Connect to `url` and handle notifications until a reload happens or the
/// server closes the connection. Idles indefinitely while nothing arrives.
pub fn listen<H: PageHost>(url: &str, host: H) -> Result<ListenEnd, ReloadError> {
    let channel = connect(url)?;
    crate::log!("reload"; "listening on {}", url);
    run(LiveReloadNotifier::new(channel, host))
}

fn run<H: PageHost>(mut notifier: LiveReloadNotifier<WsChannel, H>) -> Result<ListenEnd, ReloadError> {
    loop {
        match notifier.channel_mut().read() {
            Ok(Message::Text(text)) => {
                if notifier.on_message(text.as_str())? == Outcome::Reloaded {
                    notifier.channel_mut().drain();
                    return Ok(ListenEnd::Reloaded);
                }
            }
            Ok(Message::Close(frame)) => {
                crate::debug!("reload"; "server closed connection: {:?}", frame);
                return Ok(ListenEnd::ServerClosed);
            }
            // Ping/pong are answered by tungstenite; binary frames carry nothing for us.
            Ok(_) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                return Ok(ListenEnd::ServerClosed);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reload::notifier::{CLOSE_REASON, PageHost};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[derive(Clone, Default)]
    struct CountingHost(Arc<AtomicUsize>);

    impl PageHost for CountingHost {
        fn reload(&mut self, force: bool) -> Result<(), ReloadError> {
            assert!(force);
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Accept one client, send `frames`, then report the close frame it gets back.
    fn one_shot_server(frames: Vec<&'static str>) -> (u16, thread::JoinHandle<Option<(u16, String)>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            for frame in frames {
                ws.send(Message::Text(frame.to_string().into())).unwrap();
            }
            loop {
                match ws.read() {
                    Ok(Message::Close(frame)) => {
                        return frame.map(|f| (u16::from(f.code), f.reason.to_string()));
                    }
                    Ok(_) => continue,
                    Err(_) => return None,
                }
            }
        });
        (port, handle)
    }

    #[test]
    fn test_listen_reloads_on_build_complete() {
        let (port, server) =
            one_shot_server(vec![r#"{"type":"ping"}"#, r#"{"type":"build_complete"}"#]);
        let host = CountingHost::default();

        let end = listen(&format!("ws://127.0.0.1:{port}/websocket"), host.clone()).unwrap();

        assert_eq!(end, ListenEnd::Reloaded);
        assert_eq!(host.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            server.join().unwrap(),
            Some((1000, CLOSE_REASON.to_string()))
        );
    }

    #[test]
    fn test_listen_propagates_malformed_frame() {
        let (port, _server) = one_shot_server(vec!["not json"]);
        let host = CountingHost::default();

        let result = listen(&format!("ws://127.0.0.1:{port}/websocket"), host.clone());

        assert!(matches!(result, Err(ReloadError::Parse(_))));
        assert_eq!(host.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_connect_rejects_non_ws_url() {
        assert!(matches!(
            connect("http://localhost:5002/websocket"),
            Err(ReloadError::Url(_))
        ));
        assert!(matches!(connect("not a url"), Err(ReloadError::Url(_))));
    }

    #[test]
    fn test_connect_failure_is_an_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let result = connect(&format!("ws://127.0.0.1:{port}/websocket"));
        assert!(matches!(result, Err(ReloadError::Socket(_))));
    }
}
