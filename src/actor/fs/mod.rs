//! FileSystem Actor
//!
//! Watches content, resources and the config file, and sends one
//! `BuildMsg::Rebuild` per debounced batch of relevant changes.
//!
//! ```text
//! notify -> Debouncer (timing) -> WatchScope (relevance) -> BuildMsg
//! ```

use std::path::{Path, PathBuf};

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::BuildMsg;
use crate::config::SiteConfig;
use crate::utils::path::{has_hidden_component, normalize_path};

mod debouncer;
mod watch_roots;


use debouncer::{ChangeKind, Debouncer};
use watch_roots::WatchRoots;

/// Which paths a rebuild cares about.
#[derive(Debug, Clone)]
pub struct WatchScope {
    dirs: Vec<PathBuf>,
    config_path: Option<PathBuf>,
}

impl WatchScope {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            dirs: vec![config.build.content.clone(), config.build.resources.clone()],
            config_path: config.config_path.clone(),
        }
    }

    fn roots(&self) -> Vec<PathBuf> {
        self.dirs.iter().chain(&self.config_path).cloned().collect()
    }

    fn is_config(&self, path: &Path) -> bool {
        self.config_path.as_deref() == Some(path)
    }

    fn is_relevant(&self, path: &Path) -> bool {
        self.is_config(path)
            || self
                .dirs
                .iter()
                .any(|dir| path.starts_with(dir) && !has_hidden_component(path, dir))
    }

    /// Turn a debounced batch into a rebuild request, or `None` when
    /// nothing in it matters.
    fn classify(&self, batch: Vec<(PathBuf, ChangeKind)>) -> Option<BuildMsg> {
        let mut config_changed = false;
        let mut changed = Vec::new();

        for (path, kind) in batch {
            if !self.is_relevant(&path) {
                crate::debug!("watch"; "ignored {}: {}", kind.label(), path.display());
                continue;
            }
            config_changed |= self.is_config(&path);
            changed.push(path);
        }

        (!changed.is_empty()).then_some(BuildMsg::Rebuild {
            changed,
            config_changed,
        })
    }
}

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    scope: WatchScope,
    build_tx: mpsc::Sender<BuildMsg>,
}

impl FsActor {
    /// Start watching immediately; events buffer until `run`.
    pub fn new(scope: WatchScope, build_tx: mpsc::Sender<BuildMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(scope.roots());
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            scope,
            build_tx,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            scope,
            build_tx,
        } = self;
        let mut debouncer = Debouncer::new();

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // notify delivers on its own thread; forward into the runtime
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => {
                    let Some(event) = event else { break };
                    if matches!(event.kind, notify::EventKind::Remove(_)) {
                        for path in &event.paths {
                            watch_roots.on_removed(&normalize_path(path));
                        }
                    }
                    debouncer.add_event(&event);
                }
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    let Some(batch) = debouncer.take_if_ready() else {
                        continue;
                    };
                    let Some(msg) = scope.classify(batch) else {
                        continue;
                    };
                    if build_tx.send(msg).await.is_err() {
                        break;
                    }
                }
            }
        }
        crate::debug!("watch"; "stopped");
    }
}
