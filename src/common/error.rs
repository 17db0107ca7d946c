//! Error types for the conformance harness
//!
//! Errors fall into two bands: setup failures that abort the whole run
//! before any scenario executes, and scenario-level errors that are
//! reported as `[ERROR]` while the run continues.

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Setup Errors ===
    #[error("Missing UI binary at {path}. Build it first or set [paths] ui_binary")]
    UiBinaryNotFound { path: String },

    #[error("Scenario directory '{0}' does not exist")]
    ScenarioRootMissing(String),

    #[error("No scenarios found under {0}")]
    NoScenarios(String),

    // === Scenario Configuration Errors ===
    #[error("Scenario '{scenario}' must contain exactly one .toml and one .json (found {tomls} .toml, {jsons} .json)")]
    ArtifactCount {
        scenario: String,
        tomls: usize,
        jsons: usize,
    },

    #[error("Failed to parse '{path}': {reason}")]
    DocumentParse { path: String, reason: String },

    // === External Process Errors ===
    #[error("Failed to launch UI binary '{path}': {reason}")]
    ProcessSpawn { path: String, reason: String },

    #[error("UI binary exited with {status} for scenario '{scenario}'")]
    ProcessExit { scenario: String, status: String },

    #[error("UI binary timed out after {secs} seconds for scenario '{scenario}'")]
    ProcessTimeout { scenario: String, secs: f64 },

    #[error("{snapshot} not produced for scenario '{scenario}'")]
    SnapshotMissing { scenario: String, snapshot: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for a path
    pub fn file_read(path: &Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a document parse error for a path
    pub fn document_parse(path: &Path, reason: impl ToString) -> Self {
        Self::DocumentParse {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error aborts the run before scenarios execute
    ///
    /// These map to exit code 2; everything else is either scenario-level
    /// or a plain failure.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Error::UiBinaryNotFound { .. }
                | Error::ScenarioRootMissing(_)
                | Error::NoScenarios(_)
                | Error::Config(_)
                | Error::ConfigParse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_failures_are_classified() {
        assert!(Error::NoScenarios("actions".into()).is_setup_failure());
        assert!(Error::UiBinaryNotFound { path: "ui.exe".into() }.is_setup_failure());
        assert!(!Error::SnapshotMissing {
            scenario: "a".into(),
            snapshot: "ui_tree.json".into()
        }
        .is_setup_failure());
    }

    #[test]
    fn test_artifact_count_message() {
        let err = Error::ArtifactCount {
            scenario: "single_button".into(),
            tomls: 2,
            jsons: 1,
        };
        assert_eq!(
            err.to_string(),
            "Scenario 'single_button' must contain exactly one .toml and one .json (found 2 .toml, 1 .json)"
        );
    }
}
