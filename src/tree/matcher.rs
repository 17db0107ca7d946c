//! Partial tree matching
//!
//! An expected node constrains only the fields it carries. Children are
//! matched as an ordered subsequence: each expected child takes the first
//! actual child at or after the running cursor that has the same name,
//! and that choice is final (no backtracking). Unmatched actual children
//! are ignored.

use std::fmt;

use super::compare::equal_within_tolerance;
use super::node::{Rect, TreeNode};

/// Why a node failed to match
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Name {
        path: String,
        expected: String,
        actual: Option<String>,
    },
    Rect {
        path: String,
        expected: Rect,
        actual: Option<Rect>,
    },
    MissingChild {
        path: String,
        child: Option<String>,
    },
}

impl Mismatch {
    /// Tree path of the node where matching stopped
    pub fn path(&self) -> &str {
        match self {
            Mismatch::Name { path, .. }
            | Mismatch::Rect { path, .. }
            | Mismatch::MissingChild { path, .. } => path,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Name {
                path,
                expected,
                actual,
            } => write!(
                f,
                "name mismatch at {path}: expected '{expected}', got '{}'",
                actual.as_deref().unwrap_or("(none)")
            ),
            Mismatch::Rect {
                path,
                expected,
                actual,
            } => write!(
                f,
                "rect mismatch at {path}: expected {expected}, got {}",
                actual.unwrap_or_default()
            ),
            Mismatch::MissingChild { path, child } => write!(
                f,
                "missing child at {path}: '{}'",
                child.as_deref().unwrap_or("(unnamed)")
            ),
        }
    }
}

/// Outcome of matching one expected tree against one actual tree
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matched: bool,
    pub mismatches: Vec<Mismatch>,
}

impl MatchResult {
    /// Rendered diagnostic lines
    pub fn diagnostics(&self) -> Vec<String> {
        self.mismatches.iter().map(ToString::to_string).collect()
    }
}

/// Compares expected trees against actual trees
#[derive(Debug, Clone, Copy)]
pub struct TreeMatcher {
    tolerance: f64,
}

impl TreeMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Match two document roots, labelling the root path `root`
    pub fn match_root(&self, expected: &TreeNode, actual: &TreeNode) -> MatchResult {
        let mut mismatches = Vec::new();
        let matched = self.match_node(expected, actual, &mut mismatches, "root");
        MatchResult {
            matched,
            mismatches,
        }
    }

    /// Match one node and its matched descendants
    ///
    /// Stops at the first mismatch, appending one entry to `mismatches`.
    pub fn match_node(
        &self,
        expected: &TreeNode,
        actual: &TreeNode,
        mismatches: &mut Vec<Mismatch>,
        path: &str,
    ) -> bool {
        if let Some(expected_name) = &expected.name {
            if actual.name.as_ref() != Some(expected_name) {
                mismatches.push(Mismatch::Name {
                    path: path.to_string(),
                    expected: expected_name.clone(),
                    actual: actual.name.clone(),
                });
                return false;
            }
        }

        if let Some(expected_rect) = &expected.rect {
            if !self.rect_matches(expected_rect, actual.rect.as_ref()) {
                mismatches.push(Mismatch::Rect {
                    path: path.to_string(),
                    expected: *expected_rect,
                    actual: actual.rect,
                });
                return false;
            }
        }

        let mut cursor = 0;
        for expected_child in &expected.children {
            let Some(offset) = actual.children[cursor..]
                .iter()
                .position(|candidate| is_witness(expected_child, candidate))
            else {
                mismatches.push(Mismatch::MissingChild {
                    path: path.to_string(),
                    child: expected_child.name.clone(),
                });
                return false;
            };

            let index = cursor + offset;
            cursor = index + 1;

            let label = match &expected_child.name {
                Some(name) => name.clone(),
                None => index.to_string(),
            };
            let child_path = format!("{path}/{label}");
            if !self.match_node(expected_child, &actual.children[index], mismatches, &child_path) {
                return false;
            }
        }

        true
    }

    fn rect_matches(&self, expected: &Rect, actual: Option<&Rect>) -> bool {
        let actual = actual.copied().unwrap_or_default();
        expected
            .fields()
            .iter()
            .zip(actual.fields())
            .all(|((_, e), (_, a))| equal_within_tolerance(*e, a, self.tolerance))
    }
}

/// Whether `candidate` can stand in for `expected` during the child scan
fn is_witness(expected: &TreeNode, candidate: &TreeNode) -> bool {
    match &expected.name {
        Some(name) => candidate.name.as_ref() == Some(name),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeDocument;

    fn names(names: &[&str]) -> Vec<TreeNode> {
        names.iter().map(|n| TreeNode::named(*n)).collect()
    }

    fn parent(children: &[&str]) -> TreeNode {
        TreeNode::named("P").with_children(names(children))
    }

    fn matcher() -> TreeMatcher {
        TreeMatcher::new(0.5)
    }

    #[test]
    fn test_empty_expected_matches_anything() {
        let actual = TreeNode::named("Anything")
            .with_rect(Rect::new(1.0, 2.0, 3.0, 4.0))
            .with_children(names(&["A", "B"]));
        let result = matcher().match_root(&TreeNode::default(), &actual);
        assert!(result.matched);
        assert!(result.mismatches.is_empty());
        assert!(matcher().match_root(&TreeNode::default(), &TreeNode::default()).matched);
    }

    #[test]
    fn test_name_mismatch_short_circuits() {
        let expected = TreeNode::named("Root")
            .with_rect(Rect::new(0.0, 0.0, 1.0, 1.0))
            .with_children(names(&["Missing"]));
        let actual = TreeNode::named("Other");
        let result = matcher().match_root(&expected, &actual);
        assert!(!result.matched);
        assert_eq!(
            result.diagnostics(),
            vec!["name mismatch at root: expected 'Root', got 'Other'".to_string()]
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let result = matcher().match_root(&TreeNode::named("btn"), &TreeNode::named("Btn"));
        assert!(!result.matched);
    }

    #[test]
    fn test_ordered_subsequence_skips_extras() {
        let result = matcher().match_root(&parent(&["A", "B"]), &parent(&["X", "A", "Y", "B", "Z"]));
        assert!(result.matched, "{:?}", result.diagnostics());
    }

    #[test]
    fn test_out_of_order_children_fail() {
        let result = matcher().match_root(&parent(&["A", "B"]), &parent(&["B", "A"]));
        assert!(!result.matched);
        assert_eq!(
            result.mismatches,
            vec![Mismatch::MissingChild {
                path: "root".to_string(),
                child: Some("B".to_string()),
            }]
        );
    }

    #[test]
    fn test_greedy_witness_is_final() {
        // The first "A" is chosen and its subtree fails; the second "A"
        // would have matched but is never tried.
        let expected = TreeNode::default().with_children(vec![
            TreeNode::named("A").with_children(names(&["Leaf"]))
        ]);
        let actual = TreeNode::default().with_children(vec![
            TreeNode::named("A"),
            TreeNode::named("A").with_children(names(&["Leaf"])),
        ]);
        let result = matcher().match_root(&expected, &actual);
        assert!(!result.matched);
        assert_eq!(result.mismatches[0].path(), "root/A");
    }

    #[test]
    fn test_skipped_children_are_not_revisited() {
        let result = matcher().match_root(&parent(&["B", "A"]), &parent(&["A", "B", "C"]));
        assert!(!result.matched);
    }

    #[test]
    fn test_unnamed_child_takes_next_at_cursor() {
        let expected = TreeNode::default().with_children(vec![
            TreeNode::named("A"),
            TreeNode::default().with_rect(Rect::new(0.0, 0.0, 5.0, 5.0)),
        ]);
        let actual = TreeNode::default().with_children(vec![
            TreeNode::named("A"),
            TreeNode::named("X").with_rect(Rect::new(0.0, 0.0, 9.0, 9.0)),
            TreeNode::named("Y").with_rect(Rect::new(0.0, 0.0, 5.0, 5.0)),
        ]);
        let result = matcher().match_root(&expected, &actual);
        assert!(!result.matched);
        assert_eq!(result.mismatches[0].path(), "root/1");
    }

    #[test]
    fn test_missing_unnamed_child_diagnostic() {
        let expected = TreeNode::default().with_children(vec![TreeNode::default()]);
        let result = matcher().match_root(&expected, &TreeNode::default());
        assert_eq!(
            result.diagnostics(),
            vec!["missing child at root: '(unnamed)'".to_string()]
        );
    }

    #[test]
    fn test_nested_path_labels() {
        let expected = TreeNode::named("Root").with_children(vec![
            TreeNode::named("Panel").with_children(names(&["Ok"]))
        ]);
        let actual = TreeNode::named("Root").with_children(vec![
            TreeNode::named("Panel").with_children(names(&["Cancel"]))
        ]);
        let result = matcher().match_root(&expected, &actual);
        assert_eq!(
            result.diagnostics(),
            vec!["missing child at root/Panel: 'Ok'".to_string()]
        );
    }

    #[test]
    fn test_rect_within_tolerance() {
        let expected = TreeNode::default().with_rect(Rect::new(10.0, 0.0, 100.0, 20.0));
        let actual = TreeNode::named("B").with_rect(Rect::new(10.4, 0.2, 99.6, 20.5));
        assert!(matcher().match_root(&expected, &actual).matched);
    }

    #[test]
    fn test_missing_actual_rect_is_all_zero() {
        let expected = TreeNode::default().with_rect(Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(matcher().match_root(&expected, &TreeNode::named("B")).matched);

        let expected = TreeNode::default().with_rect(Rect::new(0.0, 0.0, 4.0, 0.0));
        let result = matcher().match_root(&expected, &TreeNode::named("B"));
        assert_eq!(
            result.diagnostics(),
            vec![r#"rect mismatch at root: expected {"x":0,"y":0,"w":4,"h":0}, got {}"#.to_string()]
        );
    }

    #[test]
    fn test_matching_is_idempotent() {
        let expected = parent(&["A", "Q"]);
        let actual = parent(&["A", "B"]);
        let first = matcher().match_root(&expected, &actual);
        let second = matcher().match_root(&expected, &actual);
        assert_eq!(first, second);
    }

    #[test]
    fn test_document_with_unconstrained_rect() {
        let expected = TreeDocument::from_json(
            r#"{"root":{"name":"Root","children":[{"name":"Btn"}]}}"#,
        )
        .unwrap();
        let actual = TreeDocument::from_json(
            r#"{"root":{"name":"Root","children":[{"name":"Btn","rect":{"x":0,"y":0,"w":10,"h":10}}]}}"#,
        )
        .unwrap();
        assert!(matcher().match_root(&expected.root, &actual.root).matched);
    }

    #[test]
    fn test_document_rect_mismatch_at_root() {
        let expected = TreeDocument::from_json(
            r#"{"root":{"name":"Root","rect":{"x":0,"y":0,"w":10,"h":10}}}"#,
        )
        .unwrap();
        let actual = TreeDocument::from_json(
            r#"{"root":{"name":"Root","rect":{"x":0,"y":0,"w":12,"h":10}}}"#,
        )
        .unwrap();
        let result = matcher().match_root(&expected.root, &actual.root);
        assert!(!result.matched);
        assert_eq!(result.mismatches.len(), 1);
        assert!(matches!(&result.mismatches[0], Mismatch::Rect { path, .. } if path == "root"));
    }
}
