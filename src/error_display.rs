//! User-facing error message formatting.
//!
//! Matches on typed errors (ChartError variants, io::ErrorKind, serde_json categories) rather
//! than parsing strings.

use std::io;
use std::path::Path;

use crate::error::ChartError;

/// Text shown in a chart's error placeholder.
pub fn user_message(err: &ChartError) -> String {
    match err {
        ChartError::InvalidBinRecord { index, reason } => format!(
            "This chart's data is malformed (bin {}: {}).",
            index + 1,
            reason
        ),
        ChartError::LoadFailure(msg) if msg.trim().is_empty() => {
            "Failed to load chart data.".to_string()
        }
        ChartError::LoadFailure(msg) => format!("Failed to load chart data: {}", msg.trim()),
        ChartError::UnrenderableKind(kind) => {
            format!("This chart cannot be displayed: {}.", kind)
        }
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::AlreadyExists => "File already exists.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

fn user_message_from_json(err: &serde_json::Error) -> String {
    use serde_json::error::Category;

    match err.classify() {
        Category::Io => "Could not read chart input.".to_string(),
        Category::Syntax => format!(
            "Chart input is not valid JSON (line {}, column {}).",
            err.line(),
            err.column()
        ),
        Category::Data => format!("Chart input has an unexpected shape: {}", err),
        Category::Eof => "Chart input ended unexpectedly.".to_string(),
    }
}

/// Format a color_eyre Report by walking its cause chain for known error types.
pub fn user_message_from_report(report: &color_eyre::eyre::Report, path: Option<&Path>) -> String {
    let with_path = |msg: String| match path {
        Some(p) => format!("Failed to load {}: {}", p.display(), msg),
        None => msg,
    };

    for cause in report.chain() {
        if let Some(err) = cause.downcast_ref::<ChartError>() {
            return with_path(user_message(err));
        }
        if let Some(err) = cause.downcast_ref::<serde_json::Error>() {
            return with_path(user_message_from_json(err));
        }
        if let Some(err) = cause.downcast_ref::<io::Error>() {
            return with_path(user_message_from_io(err, None));
        }
    }

    // first line only, no tracebacks
    let display = report.to_string();
    let first_line = display.lines().next().unwrap_or("An error occurred").trim();
    with_path(first_line.to_string())
}
