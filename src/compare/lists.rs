//! List matching strategy selection.

use super::options::CompareOptions;
use crate::node::Node;
use std::collections::HashSet;

/// ListStrategy is the comparison approach chosen for one list pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStrategy {
    /// Match elements by the value of a shared identifier field.
    Identifier(String),
    /// Match equal elements regardless of position.
    Unordered,
    /// Walk both lists position by position.
    Positional,
}

/// Picks the strategy for one list pair. Identifier matching wins when
/// a candidate field is usable on both sides; otherwise order-ignoring
/// runs and variant-style lists compare as sets; everything else is
/// positional.
pub fn select_list_strategy(from: &[Node], to: &[Node], opts: &CompareOptions) -> ListStrategy {
    if let Some(field) = identifier_field(from, to, &opts.additional_identifiers) {
        return ListStrategy::Identifier(field);
    }
    if opts.ignore_order_changes {
        return ListStrategy::Unordered;
    }
    if is_heterogeneous(from, to) {
        return ListStrategy::Unordered;
    }
    ListStrategy::Positional
}

/// Returns the first candidate identifier field usable in both lists.
/// Configured fields are tried first, then `name`, then `id`; a field
/// is usable when at least one element carries it with a primitive
/// value.
pub fn identifier_field(from: &[Node], to: &[Node], additional: &[String]) -> Option<String> {
    additional
        .iter()
        .map(String::as_str)
        .chain(["name", "id"])
        .find(|field| usable_in(from, field) && usable_in(to, field))
        .map(str::to_string)
}

fn usable_in(list: &[Node], field: &str) -> bool {
    list.iter()
        .any(|item| element_identifier(item, field).is_some())
}

/// Returns the element's identifier value in string form, if it is a
/// map carrying the field with a primitive value.
pub fn element_identifier(item: &Node, field: &str) -> Option<String> {
    let value = item.as_map()?.get(field)?;
    value.is_primitive().then(|| value.to_string())
}

/// Returns true if every element on both sides is a single-key map and
/// more than one distinct key occurs. Such lists enumerate mutually
/// exclusive variants, so position carries no meaning.
pub fn is_heterogeneous(from: &[Node], to: &[Node]) -> bool {
    let mut keys = HashSet::new();
    for item in from.iter().chain(to.iter()) {
        let Some(map) = item.as_map() else {
            return false;
        };
        if map.len() != 1 {
            return false;
        }
        if let Some(key) = map.keys().next() {
            keys.insert(key.to_string());
        }
    }
    keys.len() > 1
}
