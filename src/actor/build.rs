//! Build Actor - rebuilds the site on watcher batches
//!
//! A successful rebuild tells `WsActor` to broadcast `build_complete`;
//! a failed one only updates the status line, so open pages keep showing
//! the last good build.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{BuildMsg, WsMsg};
use crate::cli::build::{BuildReport, build_site};
use crate::config::SiteConfig;
use crate::logger::{status_error, status_success};
use crate::utils::plural::plural_count;

pub struct BuildActor {
    rx: mpsc::Receiver<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    config: Arc<SiteConfig>,
}

impl BuildActor {
    pub fn new(
        rx: mpsc::Receiver<BuildMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        config: Arc<SiteConfig>,
    ) -> Self {
        Self { rx, ws_tx, config }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                BuildMsg::Rebuild {
                    changed,
                    config_changed,
                } => {
                    for path in &changed {
                        crate::debug!("watch"; "changed: {}", self.config.root_relative(path).display());
                    }
                    if config_changed && let Err(e) = self.reload_config() {
                        status_error("config reload failed", &format!("{e:#}"));
                        continue;
                    }

                    let config = Arc::clone(&self.config);
                    let result = tokio::task::spawn_blocking(move || build_site(&config)).await;
                    match result {
                        Ok(Ok(report)) => {
                            status_success(&rebuild_summary(changed.len(), &report));
                            if self.ws_tx.send(WsMsg::BuildComplete).await.is_err() {
                                break;
                            }
                        }
                        Ok(Err(e)) => status_error("rebuild failed", &format!("{e:#}")),
                        Err(e) => status_error("rebuild panicked", &e.to_string()),
                    }
                }
                BuildMsg::Shutdown => break,
            }
        }
        crate::debug!("build"; "stopped");
    }

    /// Re-read `quire.toml` with the original CLI overrides.
    fn reload_config(&mut self) -> anyhow::Result<()> {
        let Some(cli) = self.config.cli else {
            return Ok(());
        };
        let config = SiteConfig::load(cli)?;
        crate::log!("watch"; "config reloaded");
        self.config = Arc::new(config);
        Ok(())
    }
}

fn rebuild_summary(changes: usize, report: &BuildReport) -> String {
    format!(
        "rebuilt after {} ({} written)",
        plural_count(changes, "change"),
        plural_count(report.written, "file")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        fs::create_dir_all(&config.build.content).unwrap();
        fs::write(
            config.build.content.join("hello.md"),
            "---\ntags: [dev]\ntitle: Hello\nlink: ''\ndate: 2020-05-03 10:15\n---\nHi there.\n",
        )
        .unwrap();
        (dir, config)
    }

    #[tokio::test]
    async fn test_success_broadcasts_build_complete() {
        let (_dir, config) = site();
        let (build_tx, build_rx) = mpsc::channel(4);
        let (ws_tx, mut ws_rx) = mpsc::channel(4);
        let actor = tokio::spawn(BuildActor::new(build_rx, ws_tx, Arc::new(config)).run());

        build_tx
            .send(BuildMsg::Rebuild {
                changed: vec![],
                config_changed: false,
            })
            .await
            .unwrap();

        let msg = tokio::time::timeout(Duration::from_secs(5), ws_rx.recv())
            .await
            .unwrap();
        assert!(matches!(msg, Some(WsMsg::BuildComplete)));

        build_tx.send(BuildMsg::Shutdown).await.unwrap();
        actor.await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_broadcasts_nothing() {
        let (_dir, config) = site();
        fs::write(config.build.content.join("broken.md"), "no front matter").unwrap();

        let (build_tx, build_rx) = mpsc::channel(4);
        let (ws_tx, mut ws_rx) = mpsc::channel(4);
        let actor = tokio::spawn(BuildActor::new(build_rx, ws_tx, Arc::new(config)).run());

        build_tx
            .send(BuildMsg::Rebuild {
                changed: vec![],
                config_changed: false,
            })
            .await
            .unwrap();
        build_tx.send(BuildMsg::Shutdown).await.unwrap();
        actor.await.unwrap();

        // Actor dropped its sender without sending anything
        assert!(ws_rx.recv().await.is_none());
    }

    #[test]
    fn test_rebuild_summary() {
        let report = BuildReport {
            written: 3,
            ..BuildReport::default()
        };
        assert_eq!(
            rebuild_summary(1, &report),
            "rebuilt after 1 change (3 files written)"
        );
    }
}
