//! Scenario discovery and artifact selection
//!
//! A scenario is one directory under the actions directory holding exactly
//! one `.toml` input script, exactly one expected `.json` document, and an
//! optional `meta.json` with coverage tags.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Fixed name of the tag metadata file
pub const META_FILE: &str = "meta.json";

/// Flat tag metadata declared by a scenario
pub type TagMetadata = Map<String, Value>;

/// A scenario directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Directory name
    pub name: String,
    /// Full path to the scenario directory
    pub dir: PathBuf,
}

/// The files that make up one scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioArtifacts {
    /// Input script passed to the UI binary
    pub actions: PathBuf,
    /// Expected partial tree document
    pub expected: PathBuf,
    /// Optional tag metadata
    pub meta: Option<PathBuf>,
}

/// Find scenario directories under `actions_dir`
///
/// Only directories whose full path contains `filter` are kept. Results are
/// sorted by name.
pub fn discover(actions_dir: &Path, filter: Option<&str>) -> Result<Vec<Scenario>> {
    if !actions_dir.is_dir() {
        return Err(Error::ScenarioRootMissing(
            actions_dir.display().to_string(),
        ));
    }

    let mut scenarios = Vec::new();
    for entry in std::fs::read_dir(actions_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let dir = entry.path();
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            if !dir.to_string_lossy().contains(filter) {
                continue;
            }
        }

        scenarios.push(Scenario {
            name: entry.file_name().to_string_lossy().into_owned(),
            dir,
        });
    }

    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = scenarios.len(), dir = %actions_dir.display(), "discovered scenarios");
    Ok(scenarios)
}

impl Scenario {
    /// Select the scenario's artifacts
    ///
    /// `meta.json` is excluded from the expected-document count. Anything
    /// other than exactly one script and one expected document is a
    /// configuration error.
    pub fn artifacts(&self) -> Result<ScenarioArtifacts> {
        let mut tomls = Vec::new();
        let mut jsons = Vec::new();
        let mut meta = None;

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_lowercase();
            if file_name == META_FILE {
                meta = Some(entry.path());
            } else if file_name.ends_with(".toml") {
                tomls.push(entry.path());
            } else if file_name.ends_with(".json") {
                jsons.push(entry.path());
            }
        }

        if tomls.len() != 1 || jsons.len() != 1 {
            return Err(Error::ArtifactCount {
                scenario: self.name.clone(),
                tomls: tomls.len(),
                jsons: jsons.len(),
            });
        }

        Ok(ScenarioArtifacts {
            actions: tomls.remove(0),
            expected: jsons.remove(0),
            meta,
        })
    }
}

/// Parse a tag metadata file
///
/// The document must be a JSON object.
pub fn load_tags(path: &Path) -> Result<TagMetadata> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    match serde_json::from_str::<Value>(&content).map_err(|e| Error::document_parse(path, e))? {
        Value::Object(map) => Ok(map),
        other => Err(Error::document_parse(
            path,
            format!("expected an object, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn scenario_dir(root: &Path, name: &str, files: &[&str]) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), "{}").unwrap();
        }
        dir
    }

    #[test]
    fn test_discover_sorts_and_filters() {
        let root = tempdir().unwrap();
        scenario_dir(root.path(), "zeta", &[]);
        scenario_dir(root.path(), "alpha_button", &[]);
        scenario_dir(root.path(), "beta_button", &[]);
        fs::write(root.path().join("README.md"), "not a scenario").unwrap();

        let all = discover(root.path(), None).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha_button", "beta_button", "zeta"]);

        let filtered = discover(root.path(), Some("button")).unwrap();
        assert_eq!(filtered.len(), 2);

        assert_eq!(discover(root.path(), Some("")).unwrap().len(), 3);
    }

    #[test]
    fn test_discover_missing_root() {
        let root = tempdir().unwrap();
        let err = discover(&root.path().join("actions"), None).unwrap_err();
        assert!(matches!(err, Error::ScenarioRootMissing(_)));
    }

    #[test]
    fn test_artifacts_excludes_meta() {
        let root = tempdir().unwrap();
        let dir = scenario_dir(root.path(), "single", &["single.toml", "single.json", "meta.json"]);
        let scenario = Scenario {
            name: "single".into(),
            dir: dir.clone(),
        };
        let artifacts = scenario.artifacts().unwrap();
        assert_eq!(artifacts.actions, dir.join("single.toml"));
        assert_eq!(artifacts.expected, dir.join("single.json"));
        assert_eq!(artifacts.meta, Some(dir.join("meta.json")));
    }

    #[test]
    fn test_artifacts_count_violations() {
        let root = tempdir().unwrap();
        let dir = scenario_dir(root.path(), "double", &["a.toml", "b.toml", "a.json"]);
        let scenario = Scenario {
            name: "double".into(),
            dir,
        };
        match scenario.artifacts().unwrap_err() {
            Error::ArtifactCount { tomls, jsons, .. } => {
                assert_eq!(tomls, 2);
                assert_eq!(jsons, 1);
            }
            other => panic!("unexpected error: {other}"),
        }

        let dir = scenario_dir(root.path(), "meta_only", &["a.toml", "meta.json"]);
        let scenario = Scenario {
            name: "meta_only".into(),
            dir,
        };
        assert!(matches!(
            scenario.artifacts().unwrap_err(),
            Error::ArtifactCount { jsons: 0, .. }
        ));
    }

    #[test]
    fn test_load_tags() {
        let root = tempdir().unwrap();
        let path = root.path().join("meta.json");
        fs::write(&path, r#"{"type":"button","hasLabel":true,"color":"Primary"}"#).unwrap();
        let tags = load_tags(&path).unwrap();
        assert_eq!(tags.get("type"), Some(&Value::from("button")));

        fs::write(&path, "[1, 2]").unwrap();
        assert!(load_tags(&path).is_err());

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_tags(&path).unwrap_err(), Error::DocumentParse { .. }));
    }
}
