//! CLI argument definitions
//!
//! Defines the clap arguments for the harness. Flags override values from
//! the config file and the environment.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Only run scenarios whose path contains this substring
    pub filter: Option<String>,

    /// Project root holding the actions directory and the UI binary
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/conformance.toml, then the user config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Absolute tolerance for rect comparison (overrides UI_POS_TOL)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Fail the run when a coverage matrix has gaps (same as REQUIRE_COVERAGE=1)
    #[arg(long)]
    pub require_coverage: bool,

    /// Kill the UI binary after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Also write a JSON report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// List matching scenarios without running them
    #[arg(long)]
    pub list: bool,

    /// Write a detailed log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
