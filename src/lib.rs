//! # Structured YAML Diff
//!
//! Structure-aware comparison of YAML documents.
//!
//! This library parses YAML byte streams into order-preserving document
//! trees and reports what changed between two of them in terms of
//! logical paths and typed differences, tolerating reorderings,
//! whitespace-only edits, and domain-specific identity such as
//! Kubernetes resources and named list entries.
//!
//! ## Modules
//!
//! - [`node`] - In-memory representation of parsed YAML documents
//! - [`path`] - Logical paths into a document tree
//! - [`compare`] - The structural comparator and its configuration
//!
//! ## Example
//!
//! ```
//! use structured_yaml_diff::{compare, CompareOptions, DiffKind};
//!
//! let from = b"name: web\nreplicas: 2\n";
//! let to = b"name: web\nreplicas: 3\n";
//! let diffs = compare(from, to, &CompareOptions::new())?;
//!
//! assert_eq!(diffs.len(), 1);
//! assert_eq!(diffs[0].kind, DiffKind::Modified);
//! assert_eq!(diffs[0].path.to_string(), "replicas");
//! # Ok::<(), structured_yaml_diff::CompareError>(())
//! ```

pub mod compare;
pub mod node;
pub mod path;

pub use compare::{
    compare, compare_nodes, ChrootError, CompareError, CompareOptions, DiffKind, Difference, Side,
};
pub use node::{parse, Document, Node, OrderedMap, ParseError};
pub use path::{Path, PathElement};
