//! Terminal output for sprite compilation.
//!
//! Provides Cargo-style status output with right-aligned coloured verbs,
//! gated by the configured [`LogLevel`]. All output goes to stderr.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::config::LogLevel;

/// ANSI escape codes.
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Verbosity class of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Failures; printed at every log level.
    Error,
    /// Files generated or deleted.
    Info,
    /// Per-file trace (cache hits, skipped writes).
    Debug,
}

/// Whether a message of class `message` passes the `level` gate.
pub fn enabled(level: LogLevel, message: MessageLevel) -> bool {
    match level {
        LogLevel::Silent => message == MessageLevel::Error,
        LogLevel::Info => message != MessageLevel::Debug,
        LogLevel::Debug => true,
    }
}

/// Level-gated status printer.
///
/// Colour is enabled when stderr is a terminal.
#[derive(Debug, Clone)]
pub struct Printer {
    level: LogLevel,
    color: bool,
}

impl Printer {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            color: io::stderr().is_terminal(),
        }
    }

    /// A sprite sheet was written. e.g. "   Generated sprites/icons@2x.png"
    pub fn generated(&self, path: &Path) {
        self.emit(MessageLevel::Info, GREEN, "Generated", &display_path(path));
    }

    /// A stale sprite sheet was removed.
    pub fn deleted(&self, path: &Path) {
        self.emit(MessageLevel::Info, RED, "Deleted", &display_path(path));
    }

    /// Debug trace line with a cyan verb.
    pub fn debug(&self, verb: &str, message: &str) {
        self.emit(MessageLevel::Debug, CYAN, verb, message);
    }

    /// Non-fatal problem that is still reported at every level.
    pub fn warning(&self, verb: &str, message: &str) {
        self.emit(MessageLevel::Error, YELLOW, verb, message);
    }

    /// Failure line with a red verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.emit(MessageLevel::Error, RED, verb, message);
    }

    fn emit(&self, class: MessageLevel, color: &str, verb: &str, message: &str) {
        if !enabled(self.level, class) {
            return;
        }
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(
                stderr,
                "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}"
            );
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// Return a relative display path when possible, absolute otherwise.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}
