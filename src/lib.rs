//! UI conformance harness
//!
//! Drives a UI binary through scripted scenarios and checks the widget
//! tree it dumps against partial expected trees, with a numeric tolerance
//! for geometry and a combinatorial coverage audit over scenario tags.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;
pub mod tree;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use tree::{MatchResult, TreeDocument, TreeMatcher, TreeNode};
