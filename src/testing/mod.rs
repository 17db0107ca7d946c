//! Scenario harness
//!
//! Discovers scenario directories, plays each input script through the UI
//! binary, matches the resulting tree snapshot against the expected
//! document, and audits tag coverage across the run.

mod coverage;
mod process;
mod report;
mod runner;
mod scenario;

pub use coverage::{render_value, Combination, CoverageGap, CoverageMatrix, Dimension, TYPE_TAG};
pub use process::{CommandUiProcess, ExitOutcome, UiProcess};
pub use report::{Aggregator, RunReport, Tally};
pub use runner::{ScenarioOutcome, ScenarioRunner, ScenarioStatus};
pub use scenario::{discover, load_tags, Scenario, ScenarioArtifacts, TagMetadata, META_FILE};
