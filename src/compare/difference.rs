//! Difference result types.

use crate::node::Node;
use crate::path::Path;
use serde::Serialize;

/// DiffKind classifies one reported difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffKind {
    Added,
    Removed,
    Modified,
    OrderChanged,
}

/// Difference is one reported change between two document trees.
///
/// `from` carries the left-hand value where one existed, `to` the
/// right-hand value; `document_index` names the document of a
/// multi-document stream the change belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    pub path: Path,
    pub kind: DiffKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Node>,
    pub document_index: usize,
}

impl Difference {
    /// Creates an addition at the given path.
    pub fn added(path: Path, to: Node) -> Self {
        Difference {
            path,
            kind: DiffKind::Added,
            from: None,
            to: Some(to),
            document_index: 0,
        }
    }

    /// Creates a removal at the given path.
    pub fn removed(path: Path, from: Node) -> Self {
        Difference {
            path,
            kind: DiffKind::Removed,
            from: Some(from),
            to: None,
            document_index: 0,
        }
    }

    /// Creates a value modification at the given path.
    pub fn modified(path: Path, from: Node, to: Node) -> Self {
        Difference {
            path,
            kind: DiffKind::Modified,
            from: Some(from),
            to: Some(to),
            document_index: 0,
        }
    }

    /// Creates an order change at the given path, carrying both
    /// orderings.
    pub fn order_changed(path: Path, from: Node, to: Node) -> Self {
        Difference {
            path,
            kind: DiffKind::OrderChanged,
            from: Some(from),
            to: Some(to),
            document_index: 0,
        }
    }
}
