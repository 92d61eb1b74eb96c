//! Terminal status output.
//!
//! Status lines and the progress spinner go to stderr so that rendered
//! results on stdout can be piped or redirected untouched.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::utils::ParseIssue;

/// Note printed under Markdown results on stdout.
pub const DISCLAIMER: &str = "*Note: Google Scholar does not allow for API access so results are \
inferred using a generative model and may not reflect actual listings.*";

/// Check if stderr is a terminal.
pub fn is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Format a status line, colored when `color` is set.
pub fn status_line(status: Status, msg: &str, color: bool) -> String {
    let icon = status_icon(status);
    if !color {
        return format!("{} {}", icon, msg);
    }

    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Search => format!("{} {}", icon.yellow(), msg),
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    eprintln!("{}", status_line(status, msg, is_terminal()));
}

/// Summarize parser issues on stderr.
pub fn print_issue_summary(issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    print_status(
        Status::Warning,
        &format!(
            "{} field(s) could not be read from the model response and were left blank",
            issues.len()
        ),
    );
}

/// Spinner shown while waiting for the model.
///
/// Hidden when `enabled` is false or stderr is not a terminal.
pub fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled || !is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
