//! Configuration file handling
//!
//! Settings are layered: built-in defaults, then a TOML file, then the
//! environment (`UI_POS_TOL`, `REQUIRE_COVERAGE`). Command-line flags are
//! applied last by the CLI.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::{project_config_path, user_config_path};
use super::{Error, Result};
use crate::testing::CoverageMatrix;

/// Environment variable holding the geometry tolerance
pub const TOLERANCE_ENV: &str = "UI_POS_TOL";

/// Environment variable enabling strict coverage
pub const REQUIRE_COVERAGE_ENV: &str = "REQUIRE_COVERAGE";

/// Main configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matching and run behaviour
    #[serde(default)]
    pub harness: HarnessConfig,

    /// Project-relative locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Coverage matrices, one per tag type
    #[serde(default = "CoverageMatrix::defaults")]
    pub coverage: Vec<CoverageMatrix>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            harness: HarnessConfig::default(),
            paths: PathsConfig::default(),
            coverage: CoverageMatrix::defaults(),
        }
    }
}

/// Matching and run behaviour
#[derive(Debug, Deserialize)]
pub struct HarnessConfig {
    /// Absolute tolerance for rect fields
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Fail the run when any coverage matrix has a gap
    #[serde(default)]
    pub require_coverage: bool,

    /// Kill the UI binary after this many seconds (unset = wait forever)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            require_coverage: false,
            timeout_secs: None,
        }
    }
}

fn default_tolerance() -> f64 {
    0.5
}

/// Project-relative locations
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one subdirectory per scenario
    #[serde(default = "default_actions_dir")]
    pub actions_dir: PathBuf,

    /// The UI binary under test
    #[serde(default = "default_ui_binary")]
    pub ui_binary: PathBuf,

    /// Where the UI binary writes its tree snapshot
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            actions_dir: default_actions_dir(),
            ui_binary: default_ui_binary(),
            snapshot: default_snapshot(),
        }
    }
}

fn default_actions_dir() -> PathBuf {
    PathBuf::from("actions")
}
fn default_ui_binary() -> PathBuf {
    PathBuf::from("ui.exe")
}
fn default_snapshot() -> PathBuf {
    PathBuf::from("ui_tree.json")
}

impl Config {
    /// Load configuration for a project root
    ///
    /// An explicit path must exist. Otherwise the project-level
    /// `conformance.toml` is tried, then the per-user config file, and
    /// finally the built-in defaults. Environment overrides are applied
    /// on top.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let project = project_config_path(root);
                if project.exists() {
                    Self::from_file(&project)?
                } else {
                    match user_config_path().filter(|p| p.exists()) {
                        Some(user) => Self::from_file(&user)?,
                        None => Self::default(),
                    }
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_toml(&content)
    }

    /// Parse TOML config text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(TOLERANCE_ENV) {
            self.harness.tolerance = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{TOLERANCE_ENV} must be a number, got '{raw}'"))
            })?;
        }

        if let Some(raw) = lookup(REQUIRE_COVERAGE_ENV) {
            self.harness.require_coverage = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(())
    }

    /// Check values that cannot be expressed in the TOML schema
    pub fn validate(&self) -> Result<()> {
        let tol = self.harness.tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(Error::Config(format!(
                "tolerance must be a non-negative number, got {tol}"
            )));
        }

        if self.harness.timeout_secs == Some(0) {
            return Err(Error::Config(
                "timeout_secs must be at least 1 second".to_string(),
            ));
        }

        for matrix in &self.coverage {
            matrix.validate()?;
        }

        Ok(())
    }
}
