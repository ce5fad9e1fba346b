use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Colour class of a status line label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Bold green, for completed actions (`Resolved`, `Locked`).
    Action,
    /// Bold cyan, for informational lines.
    Info,
    /// Bold yellow, for recoverable problems.
    Warn,
}

impl StatusKind {
    fn style(self) -> Style {
        match self {
            StatusKind::Action => Style::new().green().bold(),
            StatusKind::Info => Style::new().cyan().bold(),
            StatusKind::Warn => Style::new().yellow().bold(),
        }
    }
}

/// Format a Cargo-style status line: the label right-aligned to 12 columns.
pub fn format_status(kind: StatusKind, label: &str, message: &str) -> String {
    format!("{:>12} {message}", kind.style().apply_to(label))
}

/// Print a status line such as `    Resolved 4 skills` to stderr.
pub fn status(label: &str, message: &str) {
    emit(StatusKind::Action, label, message);
}

/// Like [`status`] but cyan, for informational (non-action) messages.
pub fn status_info(label: &str, message: &str) {
    emit(StatusKind::Info, label, message);
}

/// Print a warning-style status line (bold yellow label).
pub fn status_warn(label: &str, message: &str) {
    emit(StatusKind::Warn, label, message);
}

fn emit(kind: StatusKind, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{}", format_status(kind, label, message));
}

/// Animated spinner for indeterminate work such as a resolution run.
///
/// Finish it with [`ProgressBar::finish_and_clear`] before printing results.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Progress bar over `len` items, used when copying skill archives.
pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message(message.to_string());
    pb
}
