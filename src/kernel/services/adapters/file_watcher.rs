use crate::kernel::services::ports::{ChangeKind, ChangeSubscription, SourceChange};
use crate::kernel::util::lock;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

const WATCHER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Recursive watcher over one root; raw notify events are normalized into `SourceChange`s and
/// collected on demand with [`FileWatcherService::drain_changes`].
pub struct FileWatcherService {
    watcher: SharedWatcher,
    raw_event_rx: mpsc::Receiver<notify::Event>,
    root: PathBuf,
}

type SharedWatcher = Arc<Mutex<Option<RecommendedWatcher>>>;

impl FileWatcherService {
    pub fn new(root: &Path) -> Result<Self, notify::Error> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                let _ = tx.send(event);
            },
            Config::default().with_poll_interval(WATCHER_POLL_INTERVAL),
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::info!(root = %root.display(), "file watcher started");
        Ok(Self {
            watcher: Arc::new(Mutex::new(Some(watcher))),
            raw_event_rx: rx,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_running(&self) -> bool {
        lock(&self.watcher).is_some()
    }

    /// Handle that stops this watcher when stopped, for registering with the update coordinator
    /// while the host keeps draining changes.
    pub fn subscription(&self) -> WatcherSubscription {
        WatcherSubscription {
            watcher: Arc::clone(&self.watcher),
            root: self.root.clone(),
        }
    }

    /// Every change received since the last call, deduplicated and in arrival order. Paths are
    /// relative to the watch root so rule tables never match on the root's own name.
    pub fn drain_changes(&mut self) -> Vec<SourceChange> {
        let mut seen: FxHashSet<(ChangeKind, PathBuf)> = FxHashSet::default();
        let mut changes = Vec::new();
        while let Ok(event) = self.raw_event_rx.try_recv() {
            for mut change in normalize_notify_event(event) {
                if let Ok(relative) = change.path.strip_prefix(&self.root) {
                    change.path = relative.to_path_buf();
                }
                if seen.insert((change.kind, change.path.clone())) {
                    changes.push(change);
                }
            }
        }
        changes
    }
}

impl ChangeSubscription for FileWatcherService {
    fn name(&self) -> &str {
        "file-watcher"
    }

    fn stop(&mut self) {
        stop_watcher(&self.watcher, &self.root);
    }
}

pub struct WatcherSubscription {
    watcher: SharedWatcher,
    root: PathBuf,
}

impl ChangeSubscription for WatcherSubscription {
    fn name(&self) -> &str {
        "file-watcher"
    }

    fn stop(&mut self) {
        stop_watcher(&self.watcher, &self.root);
    }
}

fn stop_watcher(watcher: &SharedWatcher, root: &Path) {
    if let Some(mut watcher) = lock(watcher).take() {
        let _ = watcher.unwatch(root);
        tracing::info!(root = %root.display(), "file watcher stopped");
    }
}

fn normalize_notify_event(event: notify::Event) -> Vec<SourceChange> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Remove(_) => ChangeKind::Removed,
        EventKind::Modify(kind) => return normalize_modify_event(kind, event.paths),
        _ => return Vec::new(),
    };
    changes(kind, event.paths)
}

fn normalize_modify_event(kind: ModifyKind, paths: Vec<PathBuf>) -> Vec<SourceChange> {
    match kind {
        ModifyKind::Name(RenameMode::Both) if paths.len() >= 2 => {
            let mut paths = paths.into_iter();
            let mut out = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                out.push(SourceChange {
                    kind: ChangeKind::Removed,
                    path: from,
                });
            }
            if let Some(to) = paths.next() {
                out.push(SourceChange {
                    kind: ChangeKind::Created,
                    path: to,
                });
            }
            out
        }
        ModifyKind::Name(RenameMode::From) => changes(ChangeKind::Removed, paths),
        ModifyKind::Name(RenameMode::To) => changes(ChangeKind::Created, paths),
        ModifyKind::Metadata(_) => Vec::new(),
        ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other | ModifyKind::Name(_) => {
            changes(ChangeKind::Modified, paths)
        }
    }
}

fn changes(kind: ChangeKind, paths: Vec<PathBuf>) -> Vec<SourceChange> {
    paths
        .into_iter()
        .map(|path| SourceChange { kind, path })
        .collect()
}
