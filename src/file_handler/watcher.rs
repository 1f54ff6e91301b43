//! File system watcher for live re-rendering
//!
//! Watches the source document and reports when it changes so the
//! posters can be regenerated. The parent directory is watched rather
//! than the file itself, because many editors save by writing a temp
//! file and renaming it over the original.

use crate::error::WatcherError;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

/// Default debounce interval in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Events from the source watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The source was created or its contents changed
    Modified(PathBuf),

    /// The source was deleted or moved away
    Removed(PathBuf),

    /// Watcher error occurred
    Error(String),
}

/// Kind of change a raw notify event represents for the watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Modified,
    Removed,
}

/// Watches a single source file for changes
pub struct SourceWatcher {
    /// The underlying notify watcher
    _watcher: RecommendedWatcher,

    /// Receiver for raw events
    event_rx: Receiver<notify::Result<Event>>,

    /// File being watched
    path: PathBuf,

    /// File name used to filter directory events
    file_name: OsString,

    /// Quiet period required before a change is reported
    debounce: Duration,

    /// Latest change not yet reported
    pending: Option<Change>,

    /// Time of the latest raw event for the file
    last_event: Option<Instant>,
}

impl SourceWatcher {
    /// Start watching `path`
    pub fn new(path: impl AsRef<Path>, debounce_ms: u64) -> Result<Self, WatcherError> {
        let path = path.as_ref();
        let path = path.canonicalize().map_err(|e| WatcherError::WatchError {
            path: path.to_path_buf(),
            source: notify::Error::io(e),
        })?;

        let file_name = path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = channel();
        let watcher_config = Config::default().with_poll_interval(Duration::from_millis(debounce_ms));

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            watcher_config,
        )
        .map_err(WatcherError::InitError)?;

        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|source| WatcherError::WatchError {
                path: parent.clone(),
                source,
            })?;

        log::debug!("Watching {} for changes", path.display());

        Ok(Self {
            _watcher: watcher,
            event_rx: rx,
            path,
            file_name,
            debounce: Duration::from_millis(debounce_ms),
            pending: None,
            last_event: None,
        })
    }

    /// The canonical path being watched
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Poll for new events (non-blocking)
    ///
    /// Bursts of raw events are coalesced into one event, reported once no
    /// new event has arrived for the debounce interval. Errors are reported
    /// immediately.
    pub fn poll(&mut self) -> Vec<WatchEvent> {
        self.poll_at(Instant::now())
    }

    /// [`poll`](Self::poll) with an explicit clock
    fn poll_at(&mut self, now: Instant) -> Vec<WatchEvent> {
        let mut events = Vec::new();

        while let Ok(event_result) = self.event_rx.try_recv() {
            if let Some(error) = self.record(event_result, now) {
                events.push(error);
            }
        }

        let settled = self
            .last_event
            .is_some_and(|last| now.duration_since(last) >= self.debounce);

        if settled {
            self.last_event = None;
            match self.pending.take() {
                Some(Change::Modified) => events.push(WatchEvent::Modified(self.path.clone())),
                Some(Change::Removed) => events.push(WatchEvent::Removed(self.path.clone())),
                None => {}
            }
        }

        events
    }

    /// Note a raw event received at `at`; errors are handed back for immediate reporting
    fn record(&mut self, event_result: notify::Result<Event>, at: Instant) -> Option<WatchEvent> {
        match event_result {
            Ok(event) => {
                if let Some(change) = self.convert_event(&event) {
                    self.pending = Some(change);
                    self.last_event = Some(at);
                }
                None
            }
            Err(e) => Some(WatchEvent::Error(e.to_string())),
        }
    }

    /// Map a raw event to a change of the watched file, if it concerns it
    fn convert_event(&self, event: &Event) -> Option<Change> {
        let touches_source = event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()));

        if !touches_source {
            return None;
        }

        // A rename carrying both paths tells us which side the source is on
        if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
            let moved_away = event
                .paths
                .first()
                .is_some_and(|p| p.file_name() == Some(self.file_name.as_os_str()));
            return Some(if moved_away { Change::Removed } else { Change::Modified });
        }

        classify(&event.kind)
    }
}

fn classify(kind: &EventKind) -> Option<Change> {
    match kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(Change::Removed),
        EventKind::Create(_) | EventKind::Modify(_) => Some(Change::Modified),
        EventKind::Remove(_) => Some(Change::Removed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}
