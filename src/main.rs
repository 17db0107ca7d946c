//! UI conformance harness
//!
//! Plays every scenario under `actions/` through the UI binary, matches the
//! widget-tree snapshot it writes against the scenario's expected tree, and
//! reports pass/fail results plus tag coverage.

use clap::Parser;
use conformance::commands::RunArgs;
use conformance::{cli, common::logging};

#[derive(Parser)]
#[command(name = "ui-conformance", about = "Scenario-based UI tree conformance harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let guard = logging::init_cli(cli.args.log_file.as_deref());

    let code = match cli::run(cli.args, std::io::stdout()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_setup_failure() {
                2
            } else {
                1
            }
        }
    };

    // Flush the log file before exiting
    drop(guard);
    std::process::exit(code);
}
