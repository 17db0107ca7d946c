//! Scenario executor
//!
//! Runs one scenario: selects its artifacts, plays the input script
//! through the UI binary, loads the resulting snapshot, and matches it
//! against the expected document.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::process::{ExitOutcome, UiProcess};
use super::scenario::{load_tags, Scenario, ScenarioArtifacts, TagMetadata};
use crate::common::{Error, Result};
use crate::tree::{MatchResult, TreeDocument, TreeMatcher};

/// Final state of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Pass,
    Fail,
    Error,
}

/// Everything the aggregator needs to know about one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub status: ScenarioStatus,
    /// Mismatch lines for a failed match
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    /// Error message for a scenario that could not be matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal problems, such as an unreadable `meta.json`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Coverage tags; empty when absent or malformed
    #[serde(skip)]
    pub tags: TagMetadata,
}

impl ScenarioOutcome {
    fn new(name: &str, status: ScenarioStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
            diagnostics: Vec::new(),
            error: None,
            warnings: Vec::new(),
            tags: TagMetadata::new(),
        }
    }

    fn errored(name: &str, error: &Error) -> Self {
        let mut outcome = Self::new(name, ScenarioStatus::Error);
        outcome.error = Some(error.to_string());
        outcome
    }
}

/// Executes scenarios one at a time against a UI process
pub struct ScenarioRunner<'a> {
    process: &'a dyn UiProcess,
    matcher: TreeMatcher,
    snapshot: PathBuf,
}

impl<'a> ScenarioRunner<'a> {
    /// `snapshot` is where the UI writes its tree after each run
    pub fn new(process: &'a dyn UiProcess, matcher: TreeMatcher, snapshot: PathBuf) -> Self {
        Self {
            process,
            matcher,
            snapshot,
        }
    }

    /// Run one scenario to an outcome
    ///
    /// Never fails: every problem becomes an `Error` outcome so the caller
    /// can continue with the next scenario.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioOutcome {
        let artifacts = match scenario.artifacts() {
            Ok(artifacts) => artifacts,
            Err(e) => {
                tracing::debug!(scenario = %scenario.name, error = %e, "artifact selection failed");
                return ScenarioOutcome::errored(&scenario.name, &e);
            }
        };

        let mut warnings = Vec::new();
        let tags = match &artifacts.meta {
            Some(path) => match load_tags(path) {
                Ok(tags) => tags,
                Err(e) => {
                    tracing::warn!(scenario = %scenario.name, error = %e, "ignoring invalid meta.json");
                    warnings.push(format!("Invalid meta.json in '{}': {}", scenario.name, e));
                    TagMetadata::new()
                }
            },
            None => TagMetadata::new(),
        };

        let mut outcome = match self.execute(scenario, &artifacts).await {
            Ok(result) if result.matched => ScenarioOutcome::new(&scenario.name, ScenarioStatus::Pass),
            Ok(result) => {
                let mut outcome = ScenarioOutcome::new(&scenario.name, ScenarioStatus::Fail);
                outcome.diagnostics = result.diagnostics();
                outcome
            }
            Err(e) => ScenarioOutcome::errored(&scenario.name, &e),
        };

        outcome.warnings = warnings;
        outcome.tags = tags;
        outcome
    }

    async fn execute(&self, scenario: &Scenario, artifacts: &ScenarioArtifacts) -> Result<MatchResult> {
        remove_stale_snapshot(&self.snapshot)?;

        let exit = self.process.run(&scenario.name, &artifacts.actions).await?;
        if exit != ExitOutcome::Success {
            return Err(Error::ProcessExit {
                scenario: scenario.name.clone(),
                status: exit.to_string(),
            });
        }

        if !self.snapshot.is_file() {
            return Err(Error::SnapshotMissing {
                scenario: scenario.name.clone(),
                snapshot: self
                    .snapshot
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| self.snapshot.display().to_string()),
            });
        }

        let expected = TreeDocument::load_expected(&artifacts.expected)?;
        let actual = TreeDocument::load_snapshot(&self.snapshot)?;

        let result = self.matcher.match_root(&expected.root, &actual.root);
        tracing::debug!(
            scenario = %scenario.name,
            matched = result.matched,
            mismatches = result.mismatches.len(),
            "matched snapshot"
        );
        Ok(result)
    }
}

fn remove_stale_snapshot(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed stale snapshot");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
