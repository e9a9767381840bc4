//! Command-line arguments and subcommands for the robocheck CLI.
//!
//! Declared with the `clap` derive API. Global options apply to every
//! subcommand and override the matching configuration file values.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "robocheck",
    version,
    about = "Style checker, formatter and metadata injector for Robot Framework test files."
)]
pub struct RobocheckArgs {
    /// YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of files processed in parallel.
    #[arg(long, global = true, value_name = "N")]
    pub workers: Option<usize>,

    /// Where the check report is written.
    #[arg(long, global = true, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every rule over the .robot files under a directory and write the report.
    Check {
        /// Directory to scan.
        #[arg(required = true)]
        dir: PathBuf,
        /// Also print the report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Check, then rewrite every file in canonical layout.
    Format {
        /// Directory to scan.
        #[arg(required = true)]
        dir: PathBuf,
        /// Print a colored diff of each rewritten file.
        #[arg(long)]
        diff: bool,
    },
    /// Merge tags into the Force Tags directive of the selected files.
    AddTags {
        /// Directory to scan.
        #[arg(long, required = true)]
        root: PathBuf,
        /// Only touch files declaring one of the test cases listed in this file.
        #[arg(long, value_name = "FILE")]
        cases: Option<PathBuf>,
        /// Tags to add.
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Clone the trunk branch record of the .qc files next to the selected files.
    NewBranch {
        /// Directory to scan.
        #[arg(long, required = true)]
        root: PathBuf,
        /// Only touch directories of files declaring one of these test cases.
        #[arg(long, value_name = "FILE")]
        cases: Option<PathBuf>,
        /// Branch name, e.g. 5G21A_10.1800.
        #[arg(required = true)]
        name: String,
    },
    /// List the test cases declared by every file.
    ListCases {
        /// Directory to scan.
        #[arg(required = true)]
        dir: PathBuf,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}
