//! Session log for MaskCanvas.
//!
//! One file, `maskcanvas.log`, truncated at every launch.  It lives in the
//! directory given by `--log-dir` / `MASKCANVAS_LOG_DIR`, or in the platform
//! data directory:
//!   Windows:  `%APPDATA%\MaskCanvas\`
//!   Linux:    `~/.local/share/MaskCanvas/`
//!   macOS:    `~/Library/Application Support/MaskCanvas/`
//!
//! Uploads, exports and every message shown to the user go through
//! `log_info!` / `log_warn!` / `log_err!`.  The macros are plain expressions,
//! so they work as match arms.  Before [`init`] they do nothing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Local, NaiveTime, Utc};

pub const LOG_FILE_NAME: &str = "maskcanvas.log";

static SINK: OnceLock<Mutex<File>> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Panic,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
        }
    }
}

/// Append one line to the session log.  I/O errors are dropped.
pub fn write(level: Level, msg: &str) {
    if let Some(sink) = SINK.get()
        && let Ok(mut file) = sink.lock()
    {
        let _ = writeln!(file, "{}", format_line(Local::now().time(), level, msg));
    }
}

fn format_line(at: NaiveTime, level: Level, msg: &str) -> String {
    format!("[{}] [{}] {}", at.format("%H:%M:%S"), level.tag(), msg)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, &format!($($arg)*))
    };
}

/// Open (truncating) `<dir>/maskcanvas.log`, write the session header and
/// mirror panics into it.  Returns the log file's path.  Only the first call
/// in a process succeeds.
pub fn init(dir: &Path) -> io::Result<PathBuf> {
    if SINK.get().is_some() {
        return Err(already_open());
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let mut file = File::create(&path)?;
    write_header(&mut file, &path, Utc::now())?;

    SINK.set(Mutex::new(file)).map_err(|_| already_open())?;

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write(Level::Panic, &info.to_string());
        prev(info);
    }));
    Ok(path)
}

fn already_open() -> io::Error {
    io::Error::new(io::ErrorKind::AlreadyExists, "session log already open")
}

fn write_header(out: &mut impl Write, path: &Path, started: DateTime<Utc>) -> io::Result<()> {
    writeln!(
        out,
        "=== MaskCanvas {} session started {} ===",
        env!("CARGO_PKG_VERSION"),
        started.to_rfc3339()
    )?;
    writeln!(out, "Log file: {}", path.display())?;
    writeln!(out)
}

/// `<platform data dir>/MaskCanvas`.
pub fn default_log_dir() -> PathBuf {
    let base = if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join("Library").join("Application Support"))
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share")))
    };
    base.unwrap_or_else(|| PathBuf::from(".")).join("MaskCanvas")
}
