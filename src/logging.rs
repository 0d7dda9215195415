//! Tracing setup for the zdash binary.
//!
//! Two layers share one `EnvFilter`: a detailed layer writing to a daily rolling file, and a
//! compact layer (`LEVEL target: message`, no timestamps or source locations) whose lines feed
//! the `logs` pane through a bounded channel. When the host falls behind, pane lines are dropped
//! and counted; the file keeps everything.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "zdash.log";
const DEFAULT_FILTER: &str = "zdash=info";
const PANE_LINE_CAPACITY: usize = 512;

pub struct LoggingGuard {
    _file_guard: WorkerGuard,
    log_dir: PathBuf,
    pane_lines: Option<Receiver<String>>,
    dropped: Arc<AtomicU64>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Compact log lines for the logs pane. Can be taken once.
    pub fn take_pane_lines(&mut self) -> Option<Receiver<String>> {
        self.pane_lines.take()
    }

    /// Lines the pane channel refused because it was full.
    pub fn dropped_pane_lines(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Writer for one formatted event; sends each complete line when the event is finished.
struct PaneLineWriter {
    buf: Vec<u8>,
    tx: SyncSender<String>,
    dropped: Arc<AtomicU64>,
}

impl Write for PaneLineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PaneLineWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        for line in text.lines().map(str::trim_end).filter(|line| !line.is_empty()) {
            match self.tx.try_send(line.to_string()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

#[derive(Clone)]
struct PaneMakeWriter {
    tx: SyncSender<String>,
    dropped: Arc<AtomicU64>,
}

impl<'a> MakeWriter<'a> for PaneMakeWriter {
    type Writer = PaneLineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        PaneLineWriter {
            buf: Vec::with_capacity(128),
            tx: self.tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

fn resolve_log_dir() -> Option<PathBuf> {
    zdash::kernel::services::adapters::ensure_log_dir()
        .or_else(|_| -> io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("zdash").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()
}

pub fn init() -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir()?;
    let (file_writer, file_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE));
    let (tx, pane_lines) = mpsc::sync_channel(PANE_LINE_CAPACITY);
    let dropped = Arc::new(AtomicU64::new(0));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let pane_layer = tracing_subscriber::fmt::layer()
        .with_writer(PaneMakeWriter {
            tx,
            dropped: Arc::clone(&dropped),
        })
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(pane_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        previous(panic_info);
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _file_guard: file_guard,
        log_dir,
        pane_lines: Some(pane_lines),
        dropped,
    })
}
