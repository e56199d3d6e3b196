//! Compare module - Structure-aware comparison of document trees.
//!
//! This module turns two parsed document streams into an ordered list
//! of typed differences.

mod comparator;
mod difference;
mod equality;
mod kubernetes;
mod lists;
mod options;
mod ordering;


pub use comparator::*;
pub use difference::*;
pub use equality::*;
pub use kubernetes::*;
pub use lists::*;
pub use options::*;
pub use ordering::*;
