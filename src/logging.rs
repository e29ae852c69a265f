//! File logger with a background writer thread.
//!
//! Log lines are pushed over an mpsc channel and written out of band so the
//! render loop never blocks on disk. The log file lives beside the
//! executable. `init` is called once from `main`; before that (and in unit
//! tests) every log call is a no-op.

use std::{
    env,
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        mpsc::{self, Sender},
        OnceLock,
    },
    thread,
};

const LOG_FILE: &str = "backdrop.log";

static DEBUG: AtomicBool = AtomicBool::new(false);
static MIN_LEVEL: AtomicU8 = AtomicU8::new(0);
static LOG_TX: OnceLock<Sender<String>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Info = 0,
    Warn = 1,
    Error = 2,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn parse(s: &str) -> Level {
        match s.to_ascii_lowercase().as_str() {
            "warn" | "warning" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }
}

pub fn init(debug: bool, level: &str) {
    if LOG_TX.get().is_some() {
        return;
    }

    DEBUG.store(debug, Ordering::Relaxed);
    let min = if debug { Level::Info } else { Level::parse(level) };
    MIN_LEVEL.store(min as u8, Ordering::Relaxed);

    let (tx, rx) = mpsc::channel::<String>();
    if LOG_TX.set(tx).is_err() {
        return;
    }

    let path = log_path();
    thread::spawn(move || {
        let file = OpenOptions::new().create(true).append(true).open(&path);
        let Ok(mut file) = file else {
            return;
        };
        while let Ok(line) = rx.recv() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    });
}

#[inline]
pub fn enabled(level: Level) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

pub fn emit(level: Level, msg: std::fmt::Arguments<'_>) {
    let Some(tx) = LOG_TX.get() else {
        return;
    };
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let line = format!("{ts} [{}] {msg}", level.label());
    if DEBUG.load(Ordering::Relaxed) {
        eprintln!("{line}");
    }
    let _ = tx.send(line);
}

fn log_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(LOG_FILE)))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::enabled($crate::logging::Level::Info) {
            $crate::logging::emit($crate::logging::Level::Info, format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if $crate::logging::enabled($crate::logging::Level::Warn) {
            $crate::logging::emit($crate::logging::Level::Warn, format_args!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::emit($crate::logging::Level::Error, format_args!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_defaults_to_info() {
        assert_eq!(Level::parse("warn"), Level::Warn);
        assert_eq!(Level::parse("ERROR"), Level::Error);
        assert_eq!(Level::parse("nonsense"), Level::Info);
    }

    #[test]
    fn logging_before_init_is_a_silent_no_op() {
        emit(Level::Error, format_args!("dropped"));
    }
}
