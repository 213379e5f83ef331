//! Where rule file text comes from and how changes are reported.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Listener invoked when a watched rule source changes.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// A provider of rule file text.
///
/// Implementations must be shareable across threads; change callbacks may be
/// invoked from a background watcher thread.
pub trait RuleSource: Send + Sync {
    /// Read the full text at `path`.
    ///
    /// # Errors
    ///
    /// Any I/O failure, including a missing file.
    fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Register `callback` to run whenever the text at `path` changes.
    ///
    /// # Errors
    ///
    /// Returns an error if change watching cannot be set up.
    fn on_changed(&self, path: &Path, callback: ChangeCallback) -> io::Result<()>;
}

#[derive(Default)]
struct Subscribers {
    by_path: Mutex<HashMap<PathBuf, Vec<ChangeCallback>>>,
}

impl Subscribers {
    fn add(&self, path: &Path, callback: ChangeCallback) {
        self.by_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_path_buf())
            .or_default()
            .push(callback);
    }

    /// Invoke every callback for `path`. The lock is released before any
    /// callback runs.
    fn fire(&self, path: &Path) -> usize {
        let callbacks = self
            .by_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .unwrap_or_default();
        tracing::debug!(path = %path.display(), listeners = callbacks.len(), "rule source changed");
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }
}

/// Reads rule files from disk.
///
/// Change callbacks fire on [`notify_changed`](Self::notify_changed), and,
/// with the `watch` feature, whenever the file system reports the file was
/// created, modified or removed.
#[derive(Default)]
pub struct FsRuleSource {
    subscribers: Arc<Subscribers>,
    #[cfg(feature = "watch")]
    watchers: Mutex<HashMap<PathBuf, notify::RecommendedWatcher>>,
}

impl FsRuleSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a change at `path` to its listeners. Returns how many ran.
    pub fn notify_changed(&self, path: &Path) -> usize {
        self.subscribers.fire(path)
    }

    #[cfg(feature = "watch")]
    fn watch(&self, path: &Path) -> io::Result<()> {
        use notify::{Event, EventKind, RecursiveMode, Watcher};

        let mut watchers = self.watchers.lock().unwrap_or_else(PoisonError::into_inner);
        if watchers.contains_key(path) {
            return Ok(());
        }

        // Editors often replace files by rename, so watch the directory.
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let target = path.to_path_buf();
        let file_name = path.file_name().map(ToOwned::to_owned);
        let subscribers = Arc::clone(&self.subscribers);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                );
                if relevant && event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                    subscribers.fire(&target);
                }
            }
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "rule file watcher error");
            }
        })
        .map_err(io::Error::other)?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(io::Error::other)?;
        tracing::info!(path = %path.display(), "watching rule file");
        watchers.insert(path.to_path_buf(), watcher);
        Ok(())
    }
}

impl RuleSource for FsRuleSource {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn on_changed(&self, path: &Path, callback: ChangeCallback) -> io::Result<()> {
        #[cfg(feature = "watch")]
        self.watch(path)?;
        self.subscribers.add(path, callback);
        Ok(())
    }
}

/// An in-memory rule source for tests and hosts that ship rules embedded.
#[derive(Default)]
pub struct MemoryRuleSource {
    files: RwLock<HashMap<PathBuf, String>>,
    subscribers: Subscribers,
}

impl MemoryRuleSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_text`](Self::set_text) that fires no callbacks.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), text.into());
        self
    }

    /// Replace the text at `path` and notify its listeners.
    pub fn set_text(&self, path: impl AsRef<Path>, text: impl Into<String>) {
        let path = path.as_ref();
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), text.into());
        self.subscribers.fire(path);
    }

    /// Delete the text at `path`; later reads fail with `NotFound`.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
        self.subscribers.fire(path);
    }
}

impl RuleSource for MemoryRuleSource {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no rule source at '{}'", path.display()),
                )
            })
    }

    fn on_changed(&self, path: &Path, callback: ChangeCallback) -> io::Result<()> {
        self.subscribers.add(path, callback);
        Ok(())
    }
}
