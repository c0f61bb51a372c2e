//! Progress reporting
//!
//! Human-readable status narration for the operator. Sinks are
//! fire-and-forget: reporting never fails and never affects control flow.

use std::io::Write;

use colored::Colorize;
use tracing::{error, info, warn};

/// Severity of a progress message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    /// A phase started
    Info,
    /// A phase completed successfully
    Success,
    Warning,
    Error,
}

/// Receives progress messages in phase order
pub trait ProgressSink: Send + Sync {
    fn report(&self, level: ProgressLevel, message: &str);

    fn info(&self, message: &str) {
        self.report(ProgressLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(ProgressLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.report(ProgressLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(ProgressLevel::Error, message);
    }
}

/// Forwards progress to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, level: ProgressLevel, message: &str) {
        match level {
            ProgressLevel::Info | ProgressLevel::Success => info!("{}", message),
            ProgressLevel::Warning => warn!("{}", message),
            ProgressLevel::Error => error!("{}", message),
        }
    }
}

/// Prints coloured step lines to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn report(&self, level: ProgressLevel, message: &str) {
        let line = match level {
            ProgressLevel::Info => format!("{} {}", "»".cyan(), message),
            ProgressLevel::Success => format!("{} {}", "✓".green().bold(), message),
            ProgressLevel::Warning => format!("{} {}", "!".yellow().bold(), message.yellow()),
            ProgressLevel::Error => format!("{} {}", "✗".red().bold(), message.red()),
        };
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}
