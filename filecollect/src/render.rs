//! Template rendering for CLI output using outstanding

use std::path::Path;

use console::{style, Color};
use filecollectlib::{CollectReport, ExcludeConfig, FileOutcome};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;

/// Include templates at compile time
const HEADER_TEMPLATE: &str = include_str!("../templates/header.jinja");
const PROGRESS_TEMPLATE: &str = include_str!("../templates/progress.jinja");
const SUMMARY_TEMPLATE: &str = include_str!("../templates/summary.jinja");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.jinja");

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

/// Data context for the header template
#[derive(Debug, Serialize)]
struct HeaderContext<'a> {
    /// Resolved source directory
    source: String,
    /// Output path as given on the command line
    output: String,
    /// Excluded directory names, sorted
    excluded_dirs: Vec<&'a str>,
}

/// One progress line (pre-styled mark plus text)
#[derive(Debug, Serialize)]
struct ProgressLine {
    mark: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct ProgressContext {
    lines: Vec<ProgressLine>,
}

#[derive(Debug, Serialize)]
struct ErrorContext {
    error: String,
}

/// Create the theme
fn create_theme() -> Theme {
    Theme::new()
}

/// Map an `--format` value to an output mode.
pub fn parse_output_mode(value: &str) -> OutputMode {
    match value {
        "json" => OutputMode::Json,
        "text" => OutputMode::Text,
        "term-debug" => OutputMode::TermDebug,
        "term" => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// Color a progress mark for terminal modes; plain text otherwise.
fn mark(symbol: &str, color: Color, output_mode: OutputMode) -> String {
    match output_mode {
        OutputMode::Term => style(symbol).fg(color).force_styling(true).to_string(),
        OutputMode::Auto => style(symbol).fg(color).to_string(),
        _ => symbol.to_string(),
    }
}

/// Render the lines printed before the walk starts.
pub fn render_header(
    root: &Path,
    output: &Path,
    exclude: &ExcludeConfig,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let context = HeaderContext {
        source: root.display().to_string(),
        output: output.display().to_string(),
        excluded_dirs: exclude.sorted_dirs(),
    };

    Ok(render_with_output(
        HEADER_TEMPLATE,
        &context,
        &create_theme(),
        output_mode,
    )?)
}

/// Render one progress line per visited file.
pub fn render_progress(
    outcomes: &[FileOutcome],
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let lines = outcomes
        .iter()
        .map(|outcome| match outcome {
            FileOutcome::Collected { label } => ProgressLine {
                mark: mark("✓", Color::Green, output_mode),
                text: format!("collected: {}", label),
            },
            FileOutcome::Skipped { label, reason } => ProgressLine {
                mark: mark("✗", Color::Red, output_mode),
                text: format!("skipped: {} ({})", label, reason),
            },
        })
        .collect();

    Ok(render_with_output(
        PROGRESS_TEMPLATE,
        &ProgressContext { lines },
        &create_theme(),
        output_mode,
    )?)
}

/// Render the run report: JSON in structured modes, the summary otherwise.
pub fn render_report(
    report: &CollectReport,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(render_auto(
        SUMMARY_TEMPLATE,
        report,
        &create_theme(),
        output_mode,
    )?)
}

/// Render a failed run: an `{"error": ...}` object in structured modes.
pub fn render_error(
    err: &anyhow::Error,
    output_mode: OutputMode,
) -> Result<String, Box<dyn std::error::Error>> {
    let context = ErrorContext {
        error: format!("{:#}", err),
    };

    Ok(render_auto(
        ERROR_TEMPLATE,
        &context,
        &create_theme(),
        output_mode,
    )?)
}
