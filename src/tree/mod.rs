//! Widget tree model and matching
//!
//! Expected documents describe a partial tree; snapshots from the UI
//! binary describe the complete one. [`TreeMatcher`] compares the two.

mod compare;
mod matcher;
mod node;

pub use compare::equal_within_tolerance;
pub use matcher::{MatchResult, Mismatch, TreeMatcher};
pub use node::{Rect, TreeDocument, TreeNode};
