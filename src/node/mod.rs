//! Node module - In-memory representation of parsed YAML documents.
//!
//! This module turns byte streams into order-preserving document trees.

mod node;
mod ordered_map;
mod parse;

pub use node::*;
pub use ordered_map::*;
pub use parse::*;
