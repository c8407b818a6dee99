//! Log setup. The TUI owns the terminal, so everything goes to a file under
//! `$XDG_STATE_HOME/tonearm/` (or `~/.local/state/tonearm/`).

use std::ffi::OsString;
use std::{env, fs, path::PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program so buffered lines get flushed. Returns `None` when
/// no log file could be set up; the program runs without logs then.
pub fn init() -> Option<WorkerGuard> {
    let dir = state_dir(env::var_os("XDG_STATE_HOME"), env::var_os("HOME"))?;
    fs::create_dir_all(&dir).ok()?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("tonearm")
        .filename_suffix("log")
        .build(&dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    tracing::info!(dir = %dir.display(), "logging initialised");
    Some(guard)
}

fn state_dir(xdg_state_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match xdg_state_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home?).join(".local").join("state"),
    };
    Some(base.join("tonearm"))
}
