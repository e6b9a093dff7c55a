// This file implements the application's logging system.
// It provides macros for different log levels (INFO, WARN, ERROR, DEBUG).
// Outside a CI runner the lines are colored for a terminal; inside the runner
// (GITHUB_ACTIONS=true) warnings, errors and debug lines become workflow
// commands so the runner can annotate and filter them.

use colored::Colorize;
use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// `log_info!` for general progress messages.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => ($crate::logger::emit($crate::logger::Level::Info, format_args!($($arg)*)));
}

/// `log_warn!` for non-fatal conditions such as a stale cache entry.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => ($crate::logger::emit($crate::logger::Level::Warn, format_args!($($arg)*)));
}

/// `log_error!` for the failure that ends the run.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => ($crate::logger::emit($crate::logger::Level::Error, format_args!($($arg)*)));
}

/// `log_debug!` for detailed internal tracing, printed only when debug is on.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
            $crate::logger::emit($crate::logger::Level::Debug, format_args!($($arg)*));
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

// Global flags, each initialized once at startup.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();
static IN_RUNNER: OnceLock<bool> = OnceLock::new();

/// Initializes the logger, setting the global debug mode.
/// This function should be called once at application startup.
///
/// # Arguments
/// * `debug`: If `true`, enables debug logging; otherwise only info, warn and error are printed.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    // Workflow-command annotations show escape codes verbatim.
    if in_runner() {
        colored::control::set_override(false);
    }

    if debug {
        crate::log_debug!("Logger initialized in DEBUG mode");
    }
}

/// Checks if debug logging is currently enabled.
/// Used primarily by the `log_debug!` macro.
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}

fn in_runner() -> bool {
    *IN_RUNNER.get_or_init(|| {
        std::env::var("GITHUB_ACTIONS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// Writes one log line to stderr. Called through the `log_*!` macros.
pub fn emit(level: Level, args: fmt::Arguments<'_>) {
    eprintln!("{}", render(level, &args.to_string(), in_runner()));
}

/// Formats one line either as a runner workflow command or as a colored
/// terminal line.
fn render(level: Level, message: &str, runner: bool) -> String {
    if runner {
        match level {
            Level::Debug => format!("::debug::{}", escape_command_data(message)),
            Level::Info => message.to_string(),
            Level::Warn => format!("::warning::{}", escape_command_data(message)),
            Level::Error => format!("::error::{}", escape_command_data(message)),
        }
    } else {
        let tag = match level {
            Level::Debug => "[DEBUG]".dimmed(),
            Level::Info => "[INFO]".bright_green(),
            Level::Warn => "[WARN]".bright_yellow(),
            Level::Error => "[ERROR]".bright_red(),
        };
        format!("{tag} {message}")
    }
}

/// Workflow command payloads must not contain raw `%`, CR or LF.
pub fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
