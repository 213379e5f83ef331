use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::LoadError;
use crate::serial;
use crate::source::{ChangeCallback, FsRuleSource, RuleSource};
use crate::{validate_rules, RuleDiagnostic, RuleSetSnapshot};

#[derive(Default)]
struct ChangeState {
    stale: AtomicBool,
    listeners: Mutex<Vec<ChangeCallback>>,
}

impl ChangeState {
    fn mark_stale(&self) {
        self.stale.store(true, Ordering::SeqCst);
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &listeners {
            listener();
        }
    }
}

/// Loads rule files into snapshots and keeps the last good one.
///
/// A load that cannot read or parse the rule file never leaves the caller
/// without rules: the previous successful snapshot is served again, marked
/// with [`loaded_from_fallback`](RuleSetSnapshot::loaded_from_fallback).
/// Individual bad rules never trigger the fallback; they become diagnostics
/// in an otherwise successful snapshot.
///
/// Change notifications from the [`RuleSource`] only mark the repository
/// stale and call the registered listeners. Reloading is up to the host.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rigmap::{MemoryRuleSource, RuleRepository};
///
/// let source = Arc::new(MemoryRuleSource::new().with_file(
///     "face.json",
///     r#"[{"name":"MouthOpen","expression":"JawOpen","input_min":0,"input_max":1}]"#,
/// ));
/// let repo = RuleRepository::new(source.clone());
/// assert_eq!(repo.load("face.json").valid_count(), 1);
///
/// source.set_text("face.json", "not json");
/// let snapshot = repo.load("face.json");
/// assert!(snapshot.loaded_from_fallback());
/// assert_eq!(snapshot.valid_count(), 1);
/// ```
pub struct RuleRepository {
    source: Arc<dyn RuleSource>,
    current: RwLock<Option<Arc<RuleSetSnapshot>>>,
    changes: Arc<ChangeState>,
    subscribed: Mutex<HashSet<PathBuf>>,
    loading: Mutex<()>,
}

impl RuleRepository {
    #[must_use]
    pub fn new(source: Arc<dyn RuleSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            changes: Arc::new(ChangeState::default()),
            subscribed: Mutex::new(HashSet::new()),
            loading: Mutex::new(()),
        }
    }

    /// A repository reading from the file system.
    #[must_use]
    pub fn from_fs() -> Self {
        Self::new(Arc::new(FsRuleSource::new()))
    }

    /// Load the rule file at `path`.
    ///
    /// On success the new snapshot replaces the cached one. If the text is
    /// byte-identical to what the cached snapshot was built from, the cached
    /// snapshot is returned as-is. On a read or container parse failure the
    /// previous successful snapshot comes back flagged as a fallback; with no
    /// previous success the result is empty with one diagnostic naming the
    /// failure.
    ///
    /// Loads run one at a time, so the snapshot published last was built
    /// from the text read last. The stale flag is cleared before the text is
    /// read; a change reported while a load is running keeps it set.
    pub fn load(&self, path: impl AsRef<Path>) -> Arc<RuleSetSnapshot> {
        let path = path.as_ref();
        let _loading = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        self.subscribe(path);
        self.changes.stale.store(false, Ordering::SeqCst);
        match self.read(path) {
            Ok(snapshot) => snapshot,
            Err(err) => self.fall_back(path, &err),
        }
    }

    /// The last successfully loaded snapshot, or an empty one.
    #[must_use]
    pub fn current_snapshot(&self) -> Arc<RuleSetSnapshot> {
        self.cached().unwrap_or_default()
    }

    /// Register a listener for source changes. Listeners run on whichever
    /// thread reports the change and must not block.
    pub fn on_rules_changed(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.changes
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// `true` once a change was reported after the last call to [`load`](Self::load) began.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.changes.stale.load(Ordering::SeqCst)
    }

    fn cached(&self) -> Option<Arc<RuleSetSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn read(&self, path: &Path) -> Result<Arc<RuleSetSnapshot>, LoadError> {
        let text = self.source.read_text(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = serial::source_digest(&text);

        if let Some(cached) = self.cached() {
            if cached.source_path() == Some(path) && cached.source_digest() == Some(&digest) {
                tracing::debug!(path = %path.display(), "rule source unchanged");
                return Ok(cached);
            }
        }

        let decoded = serial::decode_rule_file(&text)?;
        let (valid, invalid) = validate_rules(&decoded.definitions);
        let mut diagnostics = decoded.diagnostics;
        diagnostics.extend(invalid);

        let snapshot = Arc::new(RuleSetSnapshot::new(valid, diagnostics).with_source(path, digest));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));

        tracing::info!(
            path = %path.display(),
            valid = snapshot.valid_count(),
            invalid = snapshot.invalid_count(),
            "rules loaded"
        );
        Ok(snapshot)
    }

    fn fall_back(&self, path: &Path, err: &LoadError) -> Arc<RuleSetSnapshot> {
        let reason = err.to_string();
        match self.cached() {
            Some(previous) => {
                tracing::warn!(path = %path.display(), error = %reason, "rule load failed, keeping previous rules");
                Arc::new(previous.as_fallback(reason))
            }
            None => {
                tracing::warn!(path = %path.display(), error = %reason, "rule load failed with no previous rules");
                Arc::new(RuleSetSnapshot::failed(RuleDiagnostic::validation(
                    path.display().to_string(),
                    "",
                    reason,
                )))
            }
        }
    }

    fn subscribe(&self, path: &Path) {
        let mut subscribed = self.subscribed.lock().unwrap_or_else(PoisonError::into_inner);
        if !subscribed.insert(path.to_path_buf()) {
            return;
        }
        let changes = Arc::clone(&self.changes);
        let callback: ChangeCallback = Arc::new(move || changes.mark_stale());
        if let Err(e) = self.source.on_changed(path, callback) {
            tracing::warn!(path = %path.display(), error = %e, "cannot watch rule source");
            subscribed.remove(path);
        }
    }
}
