//! # filecollect
//!
//! A CLI tool that concatenates every text file under a directory into one
//! output file, each file introduced by its path relative to the root.
//!
//! ## Overview
//!
//! filecollect is built on top of filecollectlib. It merges the built-in
//! directory exclusions with the ones given on the command line, runs a single
//! collection, and reports each file and a final summary.
//!
//! ## Usage
//!
//! ```bash
//! # Collect the current directory into all_files.txt
//! filecollect
//!
//! # Collect a specific directory into a named file
//! filecollect -s ./src -o output.txt
//!
//! # Exclude more directories and files by name
//! filecollect -e vendor fixtures -f Cargo.lock
//!
//! # Walk everything, including .git and target
//! filecollect --no-default-excludes
//! ```

mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use filecollectlib::{
    collect_entries, resolve_root, write_output, CollectOptions, CollectReport, ExcludeConfig,
};
use render::OutputMode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "all_files.txt";

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("filecollect")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Recursively collect the contents of every file under a directory into one file")
        .after_help(
            "Examples:\n  \
             filecollect                              # collect the current directory\n  \
             filecollect -s /path/to/dir              # collect a specific directory\n  \
             filecollect -s ./src -o output.txt       # choose the output file\n  \
             filecollect -s ./src -e .git target      # exclude directories by name\n  \
             filecollect -s ./src -f Cargo.lock       # exclude files by name",
        )
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .default_value(".")
                .help("Source directory (defaults to current directory)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .default_value(DEFAULT_OUTPUT)
                .help("Output file"),
        )
        .arg(
            Arg::new("exclude-dirs")
                .short('e')
                .long("exclude-dirs")
                .num_args(0..)
                .value_name("NAMES")
                .action(ArgAction::Append)
                .help("Directory names to exclude (space separated)"),
        )
        .arg(
            Arg::new("exclude-files")
                .short('f')
                .long("exclude-files")
                .num_args(0..)
                .value_name("NAMES")
                .action(ArgAction::Append)
                .help("File names to exclude (space separated)"),
        )
        .arg(
            Arg::new("no-default-excludes")
                .long("no-default-excludes")
                .action(ArgAction::SetTrue)
                .help("Do not use the built-in list of excluded directories"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("auto")
                .value_parser(["auto", "term", "text", "term-debug", "json"])
                .help("Console output mode (json prints the run report as JSON)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not print a line per file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase diagnostic logging (repeatable)"),
        )
}

/// Extract a list of names from matches
fn extract_names(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

/// Build the exclusion config from matches
fn build_exclude(matches: &ArgMatches) -> ExcludeConfig {
    let base = if matches.get_flag("no-default-excludes") {
        ExcludeConfig::new()
    } else {
        ExcludeConfig::with_defaults()
    };

    base.exclude_dirs_many(extract_names(matches, "exclude-dirs"))
        .exclude_files_many(extract_names(matches, "exclude-files"))
}

/// Set up diagnostics on stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("filecollectlib={level},filecollect={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Extract the output mode from matches
fn extract_output_mode(matches: &ArgMatches) -> OutputMode {
    matches
        .get_one::<String>("format")
        .map(|s| render::parse_output_mode(s))
        .unwrap_or(OutputMode::Auto)
}

/// Print a rendered block, normalizing its trailing newline.
fn emit(rendered: &str) {
    let block = rendered.trim_end_matches('\n');
    if !block.is_empty() {
        println!("{}", block);
    }
}

/// Handler for a collection run
fn collect_handler(
    matches: &ArgMatches,
    output_mode: OutputMode,
) -> Result<CollectReport, anyhow::Error> {
    let source = matches
        .get_one::<String>("source")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let output = PathBuf::from(
        matches
            .get_one::<String>("output")
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_OUTPUT),
    );
    let structured = output_mode.is_structured();
    let quiet = matches.get_flag("quiet");

    let options = CollectOptions::new()
        .exclude(build_exclude(matches))
        .excluding_output(&output);

    let root = resolve_root(source)?;
    if !structured {
        let header = render::render_header(&root, &output, &options.exclude, output_mode)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        emit(&header);
    }

    let result = collect_entries(&root, &options.exclude)?;
    if !structured && !quiet {
        let progress = render::render_progress(&result.outcomes, output_mode)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        emit(&progress);
    }

    let size = write_output(&result, &output)?;
    tracing::debug!(files = result.stats.collected, "run complete");

    Ok(CollectReport::new(result, output, size))
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));
    let output_mode = extract_output_mode(&matches);

    let rendered = match collect_handler(&matches, output_mode) {
        Ok(report) => render::render_report(&report, output_mode).map(|out| (out, true)),
        Err(e) => render::render_error(&e, output_mode).map(|out| (out, false)),
    };

    match rendered {
        Ok((output, success)) => {
            emit(&output);
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
