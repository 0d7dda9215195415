use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use zdash::core::KeyInput;
use zdash::kernel::services::adapters::{
    ensure_settings_file, load_settings, AsyncRuntime, FileWatcherService,
};
use zdash::kernel::services::ports::Settings;
use zdash::kernel::{Dashboard, KeyOutcome, PaneId, TerminalDimensions};
use zdash::tui::crossterm::{into_host_event, HostEvent};
use zdash::tui::terminal_guard::{install_panic_restore, TerminalGuard};
use zdash::tui::view;

mod logging;

const TICK: Duration = Duration::from_millis(100);
const LOG_PANE_LINES: usize = 200;

fn main() -> io::Result<()> {
    let mut logging_guard = logging::init();
    let log_rx = logging_guard
        .as_mut()
        .and_then(|guard| guard.take_pane_lines());

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::warn!(%error, "settings not loaded, using defaults");
            Settings::default()
        }
    };
    if let Err(error) = ensure_settings_file() {
        tracing::debug!(%error, "settings file not created");
    }

    let runtime = AsyncRuntime::new()?;
    let (width, height) = crossterm::terminal::size()?;
    let dimensions = TerminalDimensions::new(width, height);
    let mut dashboard = match Dashboard::from_settings(runtime.tokio_handle(), &settings, dimensions)
    {
        Ok(dashboard) => dashboard,
        Err(error) => {
            tracing::warn!(%error, "invalid dashboard settings, using built-in presets");
            let fallback = Settings {
                preset: None,
                presets: Vec::new(),
                ..settings.clone()
            };
            Dashboard::from_settings(runtime.tokio_handle(), &fallback, dimensions)
                .map_err(|error| io::Error::new(io::ErrorKind::Other, error))?
        }
    };
    dashboard.start();

    let mut watcher = watch_root(&settings).and_then(|root| match FileWatcherService::new(&root) {
        Ok(watcher) => Some(watcher),
        Err(error) => {
            tracing::warn!(root = %root.display(), %error, "file watching disabled");
            None
        }
    });
    if let Some(watcher) = &watcher {
        dashboard
            .coordinator()
            .attach_source(Box::new(watcher.subscription()));
    }

    let result = run(&mut dashboard, watcher.as_mut(), log_rx);
    dashboard.shutdown();
    if let Some(guard) = &logging_guard {
        tracing::info!(
            log_dir = %guard.log_dir().display(),
            dropped_pane_lines = guard.dropped_pane_lines(),
            "zdash exiting"
        );
    }
    result
}

fn watch_root(settings: &Settings) -> Option<PathBuf> {
    settings
        .watch_root
        .clone()
        .or_else(|| std::env::args_os().nth(1).map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
}

fn run(
    dashboard: &mut Dashboard,
    mut watcher: Option<&mut FileWatcherService>,
    log_rx: Option<Receiver<String>>,
) -> io::Result<()> {
    let guard = TerminalGuard::new()?;
    install_panic_restore(guard.restorer());
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut log_lines: VecDeque<String> = VecDeque::with_capacity(LOG_PANE_LINES);
    let logs_pane = PaneId::new("logs");

    while !dashboard.should_quit() {
        if let Some(watcher) = watcher.as_deref_mut() {
            for change in watcher.drain_changes() {
                dashboard.on_change(change.kind, change.path, None);
            }
        }
        if let Some(rx) = &log_rx {
            forward_log_lines(dashboard, rx, &logs_pane, &mut log_lines);
        }

        let snapshot = dashboard.snapshot();
        terminal.draw(|frame| view::render(frame, &snapshot))?;

        if !crossterm::event::poll(TICK)? {
            continue;
        }
        match into_host_event(crossterm::event::read()?) {
            Some(HostEvent::Key(key)) => {
                if handle_key(dashboard, &key) {
                    break;
                }
            }
            Some(HostEvent::Resize(width, height)) => {
                if let Some(change) = dashboard.resize(width, height) {
                    tracing::info!(preset = %change.applied, downgraded = change.downgraded, "preset re-applied");
                }
            }
            None => {}
        }
    }

    drop(terminal);
    guard.restorer().restore()
}

/// Returns true when the host should exit.
fn handle_key(dashboard: &mut Dashboard, key: &KeyInput) -> bool {
    match dashboard.handle_key(key) {
        KeyOutcome::Quit => true,
        KeyOutcome::Forwarded { action, pane } => {
            tracing::debug!(%pane, ?action, "pane action");
            false
        }
        KeyOutcome::Handled(_) | KeyOutcome::Ignored => false,
    }
}

fn forward_log_lines(
    dashboard: &Dashboard,
    rx: &Receiver<String>,
    pane: &PaneId,
    lines: &mut VecDeque<String>,
) {
    let mut received = false;
    while let Ok(line) = rx.try_recv() {
        if lines.len() == LOG_PANE_LINES {
            lines.pop_front();
        }
        lines.push_back(line);
        received = true;
    }
    if !received || !dashboard.registry().contains(pane) {
        return;
    }
    let payload = serde_json::Value::from(lines.iter().cloned().collect::<Vec<_>>());
    let _ = dashboard.registry().queue_update(pane, payload);
}
