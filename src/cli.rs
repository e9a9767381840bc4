//! This module is the main entry point for all CLI commands and orchestrates
//! the library: discovery, the parallel pipeline, and the report.

pub mod args;
pub mod output;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::discovery::{feature_names, load_case_list, FileDiscoverer, Gathered};
use crate::errors::{print_error, LintError};
use crate::pipeline::{Pipeline, RewriteSummary};
use crate::report::{Report, ReportLog};

use self::args::{Command, RobocheckArgs};

/// Everything passed, or nothing to do.
pub const EXIT_OK: i32 = 0;
/// Rules fired.
pub const EXIT_VIOLATIONS: i32 = 1;
/// Bad arguments or configuration, or a file could not be processed.
pub const EXIT_FAILURE: i32 = 2;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI. Never returns.
pub fn run() {
    let args = RobocheckArgs::parse();
    init_tracing(args.verbose);

    let code = execute(args).unwrap_or_else(|e| {
        print_error(e);
        EXIT_FAILURE
    });
    process::exit(code);
}

fn execute(args: RobocheckArgs) -> Result<i32, LintError> {
    let config = Arc::new(load_config(&args)?);

    match args.command {
        Command::Check { dir, json } => {
            let (pipeline, files) = prepare(&config, &dir)?;
            let report = check(&pipeline, &files)?;
            if json {
                print_json(&report)?;
            }
            Ok(verdict(&report))
        }

        Command::Format { dir, diff } => {
            let (pipeline, files) = prepare(&config, &dir)?;
            let report = check(&pipeline, &files)?;
            let summary = pipeline.format_files(&files, diff);
            output::print_rewrite_summary("format", &summary);
            Ok(rewrite_verdict(&summary).max(verdict(&report)))
        }

        Command::AddTags { root, cases, tags } => {
            let (pipeline, candidates) = select(&config, &root, cases.as_deref())?;
            let summary = pipeline.add_tags(&candidates, &tags);
            output::print_rewrite_summary("add-tags", &summary);
            Ok(rewrite_verdict(&summary))
        }

        Command::NewBranch { root, cases, name } => {
            let (pipeline, candidates) = select(&config, &root, cases.as_deref())?;
            let sidecars = FileDiscoverer::new(config.clone()).sidecars_for(&candidates);
            let summary = pipeline.new_branch(&sidecars.found, &name);
            output::print_rewrite_summary("new-branch", &summary);
            Ok(rewrite_verdict(&summary).max(gathered_verdict(&sidecars)))
        }

        Command::ListCases { dir, json } => {
            let discoverer = FileDiscoverer::new(config);
            let files = discoverer.discover_robot_files(&dir)?;
            let cases = discoverer.list_cases(&files);
            if json {
                print_json(&cases.found)?;
            } else {
                output::print_cases(&cases.found);
            }
            Ok(gathered_verdict(&cases))
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .ok();
}

/// Loads the configuration file, if any, then applies flag overrides.
fn load_config(args: &RobocheckArgs) -> Result<Config, LintError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(workers) = args.workers {
        config.workers = Some(workers);
    }
    if let Some(report) = &args.report {
        config.report_path = report.clone();
    }
    Ok(config)
}

fn prepare(config: &Arc<Config>, root: &Path) -> Result<(Pipeline, Vec<PathBuf>), LintError> {
    let files = FileDiscoverer::new(config.clone()).discover_robot_files(root)?;
    info!(root = %root.display(), files = files.len(), "discovered files");
    Ok((Pipeline::new(config.clone())?, files))
}

/// Discovers files and narrows them by case list and feature directory.
fn select(
    config: &Arc<Config>,
    root: &Path,
    cases: Option<&Path>,
) -> Result<(Pipeline, Vec<PathBuf>), LintError> {
    let (pipeline, files) = prepare(config, root)?;
    let cases: Option<BTreeSet<String>> = cases.map(load_case_list).transpose()?;
    if let Some(cases) = &cases {
        info!(features = ?feature_names(cases), "features from case list");
    }

    let candidates = FileDiscoverer::new(config.clone()).select_candidates(&files, cases.as_ref());
    if candidates.is_empty() {
        warn!(root = %root.display(), "no candidate files selected");
    }
    Ok((pipeline, candidates))
}

/// Checks every file and writes the rendered report to the report log.
fn check(pipeline: &Pipeline, files: &[PathBuf]) -> Result<Report, LintError> {
    let report = pipeline.check_files(files);
    let log = ReportLog::create(&pipeline.config().report_path)?;
    log.append(&report.render(pipeline.engine().rules(), pipeline.config()))?;
    output::print_check_summary(&report, log.path());
    Ok(report)
}

fn verdict(report: &Report) -> i32 {
    if !report.unreadable.is_empty() {
        EXIT_FAILURE
    } else if !report.passed() {
        EXIT_VIOLATIONS
    } else {
        EXIT_OK
    }
}

fn rewrite_verdict(summary: &RewriteSummary) -> i32 {
    if summary.success() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

/// Skipped paths were already logged; they only decide the exit code.
fn gathered_verdict<T>(gathered: &Gathered<T>) -> i32 {
    if gathered.is_complete() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), LintError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| LintError::Json {
        path: PathBuf::from("<stdout>"),
        source,
    })?;
    println!("{text}");
    Ok(())
}
