//! Combinatorial coverage audit
//!
//! A coverage matrix declares, for one tag `type`, the values each
//! dimension may take. The audit walks the full cross-product and reports
//! every combination that no scenario's tags declared. Values are compared
//! by their rendered text, so `true` and `"true"` are the same value.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use super::scenario::TagMetadata;
use crate::common::{Error, Result};

/// Tag key naming the matrix a scenario belongs to
pub const TYPE_TAG: &str = "type";

/// One axis of a coverage matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub values: Vec<Value>,
}

/// Declared parameter space for one tag type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMatrix {
    #[serde(rename = "type")]
    pub type_name: String,
    pub dimensions: Vec<Dimension>,
}

/// Render a tag value the way coverage compares it
///
/// Whole floats drop their fraction, so `1.0` and `1` render alike.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

impl CoverageMatrix {
    /// The built-in button matrix: label x color x disabled
    pub fn button() -> Self {
        let bools = || vec![Value::Bool(true), Value::Bool(false)];
        let colors = ["Primary", "Secondary", "Accent", "Error", "Background"]
            .into_iter()
            .map(Value::from)
            .collect();

        Self {
            type_name: "button".to_string(),
            dimensions: vec![
                Dimension {
                    name: "hasLabel".to_string(),
                    values: bools(),
                },
                Dimension {
                    name: "color".to_string(),
                    values: colors,
                },
                Dimension {
                    name: "disabled".to_string(),
                    values: bools(),
                },
            ],
        }
    }

    /// Matrices used when no configuration declares any
    pub fn defaults() -> Vec<Self> {
        vec![Self::button()]
    }

    /// Reject matrices that cannot produce a meaningful audit
    pub fn validate(&self) -> Result<()> {
        if self.type_name.is_empty() {
            return Err(Error::Config("coverage matrix has an empty type".to_string()));
        }

        let mut seen = HashSet::new();
        for dim in &self.dimensions {
            if dim.values.is_empty() {
                return Err(Error::Config(format!(
                    "coverage dimension '{}' of '{}' declares no values",
                    dim.name, self.type_name
                )));
            }
            if !seen.insert(dim.name.as_str()) {
                return Err(Error::Config(format!(
                    "coverage dimension '{}' declared twice for '{}'",
                    dim.name, self.type_name
                )));
            }
        }
        Ok(())
    }

    /// Size of the full cross-product
    pub fn combination_count(&self) -> usize {
        self.dimensions.iter().map(|d| d.values.len()).product()
    }

    /// Every combination as rendered values, first dimension outermost
    pub fn combinations(&self) -> Vec<Vec<String>> {
        self.dimensions.iter().fold(vec![Vec::new()], |acc, dim| {
            acc.iter()
                .flat_map(|prefix| {
                    dim.values.iter().map(move |value| {
                        let mut tuple = prefix.clone();
                        tuple.push(render_value(value));
                        tuple
                    })
                })
                .collect()
        })
    }

    /// The rendered tuple a scenario's tags declare for this matrix
    ///
    /// `None` when the tags belong to another type or leave a dimension out.
    fn tuple_of(&self, tags: &TagMetadata) -> Option<Vec<String>> {
        let declared = tags.get(TYPE_TAG).map(render_value)?;
        if declared != self.type_name {
            return None;
        }
        self.dimensions
            .iter()
            .map(|dim| tags.get(&dim.name).map(render_value))
            .collect()
    }

    /// Compare observed tags against the full cross-product
    pub fn audit<'a, I>(&self, tags: I) -> CoverageGap
    where
        I: IntoIterator<Item = &'a TagMetadata>,
    {
        let seen: HashSet<Vec<String>> = tags
            .into_iter()
            .filter_map(|t| self.tuple_of(t))
            .collect();

        let all = self.combinations();
        let total = self.combination_count();
        let names: Vec<String> = self.dimensions.iter().map(|d| d.name.clone()).collect();

        let missing: Vec<Combination> = all
            .into_iter()
            .filter(|tuple| !seen.contains(tuple))
            .map(|tuple| Combination(names.iter().cloned().zip(tuple).collect()))
            .collect();

        tracing::debug!(
            matrix = %self.type_name,
            total,
            missing = missing.len(),
            "coverage audited"
        );

        CoverageGap {
            type_name: self.type_name.clone(),
            observed: total - missing.len(),
            total,
            missing,
        }
    }
}

/// One point of a matrix: dimension name and rendered value pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination(pub Vec<(String, String)>);

impl Combination {
    /// Value of a dimension in this combination
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of auditing one matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageGap {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Distinct combinations exercised
    pub observed: usize,
    /// Size of the cross-product
    pub total: usize,
    pub missing: Vec<Combination>,
}

impl CoverageGap {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
