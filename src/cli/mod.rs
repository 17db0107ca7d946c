//! CLI command handling
//!
//! Resolves configuration, checks the harness setup, and hands the
//! discovered scenarios to the aggregator.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::commands::RunArgs;
use crate::common::config::Config;
use crate::common::{paths, Error, Result};
use crate::testing::{discover, Aggregator, CommandUiProcess, Scenario, ScenarioRunner};
use crate::tree::TreeMatcher;

/// Run the harness and return the process exit code
///
/// Setup failures (missing binary, no scenarios, bad configuration) are
/// returned as errors; scenario problems only affect the exit code.
pub async fn run<W: Write>(args: RunArgs, mut out: W) -> Result<i32> {
    let root = args
        .root
        .canonicalize()
        .map_err(|_| Error::ScenarioRootMissing(args.root.display().to_string()))?;

    let config = resolve_config(&args, &root)?;
    let actions_dir = paths::resolve(&root, &config.paths.actions_dir);

    if args.list {
        for scenario in find_scenarios(&actions_dir, args.filter.as_deref())? {
            writeln!(out, "{}", scenario.name)?;
        }
        return Ok(0);
    }

    let binary = paths::find_ui_binary(&root, &config.paths.ui_binary).ok_or_else(|| {
        Error::UiBinaryNotFound {
            path: paths::resolve(&root, &config.paths.ui_binary)
                .display()
                .to_string(),
        }
    })?;
    let binary = binary.canonicalize().unwrap_or(binary);

    let scenarios = find_scenarios(&actions_dir, args.filter.as_deref())?;

    tracing::info!(
        binary = %binary.display(),
        tolerance = config.harness.tolerance,
        require_coverage = config.harness.require_coverage,
        "harness configured"
    );

    let process = CommandUiProcess::new(binary, root.clone())
        .with_timeout(config.harness.timeout_secs.map(Duration::from_secs));
    let snapshot = paths::resolve(&root, &config.paths.snapshot);
    let runner = ScenarioRunner::new(
        &process,
        TreeMatcher::new(config.harness.tolerance),
        snapshot,
    );

    let report = Aggregator::new(
        runner,
        &config.coverage,
        config.harness.require_coverage,
        &mut out,
    )
    .run(&scenarios)
    .await?;

    if let Some(path) = &args.json {
        report.write_json(path)?;
    }

    Ok(report.exit_code())
}

/// Load the config file and apply command-line overrides
fn resolve_config(args: &RunArgs, root: &Path) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref(), root)?;

    if let Some(tolerance) = args.tolerance {
        config.harness.tolerance = tolerance;
    }
    if args.require_coverage {
        config.harness.require_coverage = true;
    }
    if args.timeout.is_some() {
        config.harness.timeout_secs = args.timeout;
    }

    config.validate()?;
    Ok(config)
}

fn find_scenarios(actions_dir: &Path, filter: Option<&str>) -> Result<Vec<Scenario>> {
    let scenarios = discover(actions_dir, filter)?;
    if scenarios.is_empty() {
        return Err(Error::NoScenarios(actions_dir.display().to_string()));
    }
    Ok(scenarios)
}
