//! Log output setup
//!
//! Console commands log to stderr. The stdio servers (`serve`, `gateway`)
//! use stdout for protocol traffic, so they log to a file under
//! `~/.grocerylist` instead.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Overrides the log file name (or path) used by the stdio servers
pub const LOG_FILE_ENV: &str = "GROCERYLIST_LOG_FILE";

/// A thread-safe writer that flushes and syncs every write to its file.
///
/// Server logs have to be readable while a client still holds the process
/// open, so nothing is left sitting in a buffer.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use std::fs::File;
/// use grocerylist_cli::logging::FileWriterGuard;
///
/// let file = File::create("gateway.log").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file.
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl io::Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock()?;
        let written = io::Write::write(&mut *file, buf)?;
        io::Write::flush(&mut *file)?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.lock()?;
        io::Write::flush(&mut *file)?;
        file.sync_all()
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// stderr
    Console,
    /// `~/.grocerylist/<name>`, unless overridden by `GROCERYLIST_LOG_FILE`
    File(&'static str),
}

/// Pick the level from the global flags
pub fn log_level(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Directory server logs are written to
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".grocerylist"))
        .unwrap_or_else(|| PathBuf::from(".grocerylist"))
}

/// Resolve the file a server mode logs to
pub fn log_file_path(default_name: &str) -> PathBuf {
    let name = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| default_name.to_string());
    log_dir().join(name)
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG`, when set, overrides the level chosen by the flags.
pub fn init_logging(level: Level, target: LogTarget) {
    let LogTarget::File(default_name) = target else {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(env_filter(level))
            .init();
        return;
    };

    let path = log_file_path(default_name);
    match open_log_file(&path) {
        Ok(file) => {
            let shared = Arc::new(Mutex::new(file));
            tracing_subscriber::fmt()
                .with_writer(move || FileWriterGuard::new(shared.clone()))
                .with_env_filter(env_filter(level))
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_env_filter(env_filter(level))
                .init();
            tracing::warn!(
                "Failed to open log file {}, using stderr: {}",
                path.display(),
                e
            );
        }
    }
}
