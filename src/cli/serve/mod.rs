//! Development server with live reload support.
//!
//! Serves the output directory over HTTP. With `watch` on, pages get a
//! `<script src="/livereload.js">` tag and the actor system rebuilds on
//! change and broadcasts `build_complete`.

mod inject;
mod lifecycle;
mod path;
mod response;

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use anyhow::Result;
use crossbeam::channel;
use tiny_http::{Method, Request, Server};

use super::build::{build_site, clean_output, summary};
use crate::config::SiteConfig;
use crate::embed::serve::LIVERELOAD_PATH;
use crate::logger::status_error;
use crate::{debug, log};

/// Request handler threads
const REQUEST_THREADS: usize = 4;

/// Port the WebSocket acceptor actually bound (may be above `reload.port`
/// if that one was taken). Updated by the coordinator after binding.
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(0);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

fn get_actual_ws_port() -> u16 {
    ACTUAL_WS_PORT.load(Ordering::Relaxed)
}

/// `quire serve`: build once, then serve until Ctrl+C.
pub fn run(config: SiteConfig) -> Result<()> {
    if config.build.clean {
        clean_output(&config)?;
    }

    match build_site(&config) {
        Ok(report) => log!("build"; "{}", summary(&report)),
        // A broken post should not stop the loop, the next save can fix it
        Err(e) if config.serve.watch => status_error("initial build failed", &format!("{e:#}")),
        Err(e) => return Err(e),
    }

    let config = Arc::new(config);
    bind_server(&config)?.run(config)
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server and register it for Ctrl+C shutdown.
pub fn bind_server(config: &SiteConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    if config.serve.watch {
        set_actual_ws_port(config.reload.port);
        debug!("reload"; "{}", config.reload.url());
    }

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the request loop (blocking).
    pub fn run(self, config: Arc<SiteConfig>) -> Result<()> {
        let actor_handle = lifecycle::spawn_actors(
            Arc::clone(&config),
            config.serve.watch,
            self.shutdown_rx,
        )?;
        run_request_loop(&self.server, &config)?;
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(server: &Server, config: &Arc<SiteConfig>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .thread_name(|i| format!("quire-http-{i}"))
        .build()?;

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    let livereload = config.serve.watch;
    let path = request.url().split(['?', '#']).next().unwrap_or_default();

    if livereload && path == LIVERELOAD_PATH {
        let ws_url = config.reload.url_with_port(get_actual_ws_port());
        return response::respond_livereload_js(request, &ws_url);
    }

    debug!("serve"; "{} {}", request.method(), request.url());
    match path::resolve_path(request.url(), &config.build.output) {
        Some(file) => response::respond_file(request, &file, livereload),
        None => response::respond_not_found(request, config, livereload),
    }
}
