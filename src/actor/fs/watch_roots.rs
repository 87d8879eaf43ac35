use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Keeps the watcher attached to every root that exists.
///
/// `resources/` may be created after serve starts, and editors that save
/// by rename detach a watch on `quire.toml`; both are picked up again on
/// the next maintenance pass.
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing(
        &mut self,
        watcher: &mut RecommendedWatcher,
    ) -> notify::Result<()> {
        for path in &self.desired {
            if !path.exists() {
                crate::debug!("watch"; "not watching missing {}", path.display());
                continue;
            }
            watcher.watch(path, mode_for(path))?;
            self.attached.insert(path.clone());
        }
        Ok(())
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }
            // Re-watching a file that was replaced needs the old handle gone
            let _ = watcher.unwatch(path);
            if watcher.watch(path, mode_for(path)).is_ok() {
                self.attached.insert(path.clone());
                crate::debug!("watch"; "re-attached watch: {}", path.display());
            }
        }
    }

    /// Forget a root the watcher reported as removed, so `maintain`
    /// attaches whatever now lives at that path.
    pub(super) fn on_removed(&mut self, path: &std::path::Path) {
        if self.attached.remove(path) {
            crate::debug!("watch"; "root removed: {}", path.display());
        }
    }

    /// Roots currently attached.
    #[cfg(test)]
    pub(super) fn attached(&self) -> usize {
        self.attached.len()
    }
}

fn mode_for(path: &std::path::Path) -> RecursiveMode {
    if path.is_dir() {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    }
}
