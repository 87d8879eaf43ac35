//! Server lifecycle management.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::{Receiver, Sender};
use tiny_http::Server;

use crate::{actor::Coordinator, config::SiteConfig, core::register_server, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Actor runtime worker threads
const ACTOR_WORKERS: usize = 2;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: std::net::IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // Port 0 asks the OS for one; report what it picked
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler set up in `main` unblocks the
/// server and notifies the actors.
pub fn register_server_for_shutdown(server: Arc<Server>, shutdown_tx: Sender<()>) {
    register_server(server, shutdown_tx);
}

/// Spawn the actor system on its own thread with a tokio runtime.
pub fn spawn_actors(
    config: Arc<SiteConfig>,
    watch_enabled: bool,
    shutdown_rx: Receiver<()>,
) -> Result<Option<JoinHandle<()>>> {
    if !watch_enabled {
        return Ok(None);
    }

    // Multi-thread: WsActor relies on `block_in_place`
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(ACTOR_WORKERS)
        .enable_all()
        .build()?;

    Ok(Some(thread::spawn(move || {
        rt.block_on(async {
            let coordinator = Coordinator::with_config(config).with_shutdown_signal(shutdown_rx);
            if let Err(e) = coordinator.run().await {
                log!("actor"; "error: {}", e);
            }
        });
        // Watcher task never returns on its own
        rt.shutdown_timeout(Duration::from_millis(200));
    })))
}

/// Wait for actor system to shutdown gracefully (max 2 seconds).
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
