//! Recursive value equality used by set-style matching.

use super::options::CompareOptions;
use crate::node::Node;

/// Returns true if two values count as equal under the given options.
/// String pairs honor `ignore_whitespace_changes`; everything else is
/// full structural equality.
pub fn values_equal(a: &Node, b: &Node, opts: &CompareOptions) -> bool {
    if let (Node::String(x), Node::String(y)) = (a, b) {
        return strings_equal(x, y, opts);
    }
    deep_equal(a, b, opts)
}

/// Full structural equality. Map key order is irrelevant; list order
/// is significant; values of different kinds are never equal. A NaN
/// float equals another NaN, so a parsed document equals itself.
pub fn deep_equal(a: &Node, b: &Node, opts: &CompareOptions) -> bool {
    match (a, b) {
        (Node::Null, Node::Null) => true,
        (Node::Bool(x), Node::Bool(y)) => x == y,
        (Node::Int(x), Node::Int(y)) => x == y,
        (Node::Float(x), Node::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Node::String(x), Node::String(y)) => strings_equal(x, y, opts),
        (Node::List(x), Node::List(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(v, w)| deep_equal(v, w, opts))
        }
        (Node::Map(x), Node::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| deep_equal(v, w, opts)))
        }
        _ => false,
    }
}

fn strings_equal(x: &str, y: &str, opts: &CompareOptions) -> bool {
    if opts.ignore_whitespace_changes {
        x.trim() == y.trim()
    } else {
        x == y
    }
}
