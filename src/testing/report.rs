//! Run aggregation and console report
//!
//! The aggregator owns the run's mutable state (tallies, outcomes, coverage
//! tags), drives the executor over every scenario in order, and writes the
//! console report to any `Write` sink.

use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use super::coverage::{CoverageGap, CoverageMatrix};
use super::runner::{ScenarioOutcome, ScenarioRunner, ScenarioStatus};
use super::scenario::{Scenario, TagMetadata};
use crate::common::{Error, Result};

/// Pass/fail counters for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    /// Failures and errors together
    pub failed: usize,
}

/// Machine-readable summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioOutcome>,
    #[serde(flatten)]
    pub tally: Tally,
    pub coverage: Vec<CoverageGap>,
    pub require_coverage: bool,
}

impl RunReport {
    /// Whether every coverage matrix is fully exercised
    pub fn coverage_complete(&self) -> bool {
        self.coverage.iter().all(CoverageGap::is_complete)
    }

    /// Overall outcome: scenario failures always fail the run, coverage
    /// gaps only in strict mode
    pub fn success(&self) -> bool {
        self.tally.failed == 0 && (!self.require_coverage || self.coverage_complete())
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| {
            Error::Config(format!(
                "Cannot write JSON report '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Drives a run and accumulates its results
pub struct Aggregator<'a, W: Write> {
    runner: ScenarioRunner<'a>,
    matrices: &'a [CoverageMatrix],
    require_coverage: bool,
    out: W,
    tally: Tally,
    outcomes: Vec<ScenarioOutcome>,
    tags: Vec<TagMetadata>,
}

impl<'a, W: Write> Aggregator<'a, W> {
    pub fn new(
        runner: ScenarioRunner<'a>,
        matrices: &'a [CoverageMatrix],
        require_coverage: bool,
        out: W,
    ) -> Self {
        Self {
            runner,
            matrices,
            require_coverage,
            out,
            tally: Tally::default(),
            outcomes: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Run every scenario in order, then audit coverage
    pub async fn run(mut self, scenarios: &[Scenario]) -> Result<RunReport> {
        tracing::info!(count = scenarios.len(), "running scenarios");

        for scenario in scenarios {
            let outcome = self.runner.run(scenario).await;
            self.record(outcome)?;
        }

        self.finish()
    }

    /// Print and count one scenario outcome
    pub fn record(&mut self, mut outcome: ScenarioOutcome) -> Result<()> {
        for warning in &outcome.warnings {
            writeln!(self.out, "{} {}", "[WARN]".yellow(), warning)?;
        }

        match outcome.status {
            ScenarioStatus::Pass => {
                writeln!(self.out, "{} {}", "[PASS]".green(), outcome.name)?;
                self.tally.passed += 1;
            }
            ScenarioStatus::Fail => {
                writeln!(self.out, "{} {}", "[FAIL]".red(), outcome.name)?;
                for line in &outcome.diagnostics {
                    writeln!(self.out, "  - {line}")?;
                }
                self.tally.failed += 1;
            }
            ScenarioStatus::Error => {
                writeln!(
                    self.out,
                    "{} {}: {}",
                    "[ERROR]".red().bold(),
                    outcome.name,
                    outcome.error.as_deref().unwrap_or("unknown error")
                )?;
                self.tally.failed += 1;
            }
        }

        if !outcome.tags.is_empty() {
            self.tags.push(std::mem::take(&mut outcome.tags));
        }
        self.outcomes.push(outcome);
        Ok(())
    }

    /// Print the summary and coverage sections
    pub fn finish(mut self) -> Result<RunReport> {
        writeln!(
            self.out,
            "\nSummary: {} passed, {} failed",
            self.tally.passed, self.tally.failed
        )?;

        let mut coverage = Vec::with_capacity(self.matrices.len());
        for matrix in self.matrices {
            let gap = matrix.audit(&self.tags);
            self.write_gap(&gap)?;
            coverage.push(gap);
        }

        let report = RunReport {
            scenarios: self.outcomes,
            tally: self.tally,
            coverage,
            require_coverage: self.require_coverage,
        };

        tracing::info!(
            passed = report.tally.passed,
            failed = report.tally.failed,
            coverage_complete = report.coverage_complete(),
            "run finished"
        );
        Ok(report)
    }

    fn write_gap(&mut self, gap: &CoverageGap) -> Result<()> {
        if gap.is_complete() {
            writeln!(
                self.out,
                "\n[Coverage] {} variants fully covered.",
                gap.type_name
            )?;
            return Ok(());
        }

        writeln!(
            self.out,
            "\n[Coverage] Missing {} combinations ({}):",
            gap.type_name,
            gap.missing.len()
        )?;
        for combination in &gap.missing {
            writeln!(self.out, "  - {combination}")?;
        }
        Ok(())
    }
}
