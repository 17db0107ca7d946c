//! Widget tree model
//!
//! Expected and actual trees share one shape. On the expected side every
//! field is optional and an absent field means "no constraint". Snapshots
//! produced by the UI binary are checked for completeness when loaded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::common::{Error, Result};

/// Geometry of a widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

impl Rect {
    /// A rect with all four fields set
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            w: Some(w),
            h: Some(h),
        }
    }

    /// Fields in `x, y, w, h` order
    pub fn fields(&self) -> [(&'static str, Option<f64>); 4] {
        [("x", self.x), ("y", self.y), ("w", self.w), ("h", self.h)]
    }

    fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_some())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in self.fields() {
            if let Some(v) = value {
                if !first {
                    write!(f, ",")?;
                }
                write!(f, "\"{key}\":{v}")?;
                first = false;
            }
        }
        write!(f, "}}")
    }
}

/// A node in a widget tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Entity id assigned by the UI; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// A node constrained only by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builder-style rect setter
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Builder-style children setter
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Find the first node (depth-first) missing a name or a full rect
    ///
    /// Returns the tree path of the offending node.
    pub fn first_incomplete(&self, path: &str) -> Option<String> {
        let complete = self.name.is_some() && self.rect.is_some_and(|r| r.is_complete());
        if !complete {
            return Some(path.to_string());
        }
        self.children.iter().enumerate().find_map(|(i, child)| {
            let label = child.name.clone().unwrap_or_else(|| i.to_string());
            child.first_incomplete(&format!("{path}/{label}"))
        })
    }
}

/// A tree document: `{ "root": <node> }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub root: TreeNode,
}

impl TreeDocument {
    /// Parse a document from JSON text
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Load an expected (partial) document
    pub fn load_expected(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::from_json(&content).map_err(|e| Error::document_parse(path, e))
    }

    /// Load a snapshot written by the UI binary
    ///
    /// Every node must carry a name and a complete rect.
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let doc = Self::load_expected(path)?;
        if let Some(node_path) = doc.root.first_incomplete("root") {
            return Err(Error::document_parse(
                path,
                format!("snapshot node at {node_path} is missing a name or rect field"),
            ));
        }
        Ok(doc)
    }
}
