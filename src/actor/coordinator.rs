//! Actor Coordinator - wires up the live-reload actor system
//!
//! The Coordinator is a thin orchestrator: it creates the channels, starts
//! the WebSocket acceptor, and runs the actors until shutdown. Rebuild logic
//! lives in `cli::build`.
//!
//! ```text
//! FsActor --Rebuild--> BuildActor --BuildComplete--> WsActor
//!                                   acceptor --AddClient--^
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::build::BuildActor;
use super::fs::{FsActor, WatchScope};
use super::messages::{BuildMsg, WsMsg};
use super::ws::WsActor;
use crate::config::SiteConfig;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// How long actors get to wind down after the shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Coordinator - wires up and runs the actor system
pub struct Coordinator {
    config: Arc<SiteConfig>,
    /// Optional shutdown signal receiver
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<SiteConfig>) -> Self {
        Self {
            config,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(mut self) -> Result<()> {
        let (build_tx, build_rx) = mpsc::channel::<BuildMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        match crate::reload::server::start_ws_server_with_channel(
            &self.config.reload.host,
            self.config.reload.port,
            ws_tx.clone(),
        ) {
            Ok(actual_port) => crate::cli::serve::set_actual_ws_port(actual_port),
            Err(e) => crate::log!("actor"; "websocket server failed: {}", e),
        }

        let fs_actor = FsActor::new(WatchScope::from_config(&self.config), build_tx.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let build_actor = BuildActor::new(build_rx, ws_tx.clone(), Arc::clone(&self.config));
        let ws_actor = WsActor::new(ws_rx, self.config.reload.path.clone());

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        run_actors(fs_actor, build_actor, ws_actor, build_tx, ws_tx, shutdown_rx).await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// Run all actors concurrently
async fn run_actors(
    fs: FsActor,
    build: BuildActor,
    ws: WsActor,
    build_tx: mpsc::Sender<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let fs_handle = tokio::spawn(fs.run());
    let build_handle = tokio::spawn(build.run());
    let ws_handle = tokio::spawn(ws.run());

    if let Some(rx) = shutdown_rx {
        // crossbeam receiver, so poll
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    } else {
        // Without a signal the watcher decides when the loop is over
        let _ = fs_handle.await;
    }

    // Stop rebuilding first, then close the pages' sockets
    let _ = build_tx.send(BuildMsg::Shutdown).await;
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, build_handle).await;

    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, ws_handle).await;
}
