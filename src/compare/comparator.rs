//! Recursive structural comparison.

use super::difference::Difference;
use super::equality::values_equal;
use super::kubernetes::{is_kubernetes_resource, kubernetes_identifier};
use super::lists::{element_identifier, select_list_strategy, ListStrategy};
use super::options::CompareOptions;
use super::ordering::order_differences;
use crate::node::{parse, Document, Node, OrderedMap, ParseError};
use crate::path::{Path, PathElement};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Side names the input a compare error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::From => write!(f, "from"),
            Side::To => write!(f, "to"),
        }
    }
}

/// ChrootError reports a configured chroot path that does not resolve
/// in some document of the named side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("chroot path {path:?} does not resolve in the {side} document")]
pub struct ChrootError {
    pub path: String,
    pub side: Side,
}

/// CompareError is the failure surface of [`compare`].
#[derive(Debug, PartialEq, Error)]
pub enum CompareError {
    #[error("failed to parse the {side} input: {source}")]
    Parse {
        side: Side,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Chroot(#[from] ChrootError),
    #[error("document counts differ: {from} on the from side, {to} on the to side")]
    DocumentCount { from: usize, to: usize },
}

impl CompareError {
    fn parse(side: Side, source: ParseError) -> Self {
        CompareError::Parse { side, source }
    }
}

/// Compares two YAML byte streams and returns the differences in
/// presentation order.
///
/// Both streams are parsed, `swap` exchanges the parsed sides, chroot
/// paths re-root every document of their side, and the comparator then
/// walks the document pairs.
pub fn compare(
    from: &[u8],
    to: &[u8],
    opts: &CompareOptions,
) -> Result<Vec<Difference>, CompareError> {
    let mut from_docs = parse(from).map_err(|e| CompareError::parse(Side::From, e))?;
    let mut to_docs = parse(to).map_err(|e| CompareError::parse(Side::To, e))?;

    if opts.swap {
        std::mem::swap(&mut from_docs, &mut to_docs);
    }

    if let Some(path) = &opts.chroot_from {
        from_docs = apply_chroot(&from_docs, path, Side::From)?;
    }
    if let Some(path) = &opts.chroot_to {
        to_docs = apply_chroot(&to_docs, path, Side::To)?;
    }

    let mut diffs = Comparator::new(opts).compare_documents(&from_docs, &to_docs)?;
    order_differences(&mut diffs);
    Ok(diffs)
}

/// Compares two optional nodes at a path, without the final ordering
/// pass. Either side may be absent, meaning the path does not exist in
/// that tree.
pub fn compare_nodes(
    path: &Path,
    from: Option<&Node>,
    to: Option<&Node>,
    opts: &CompareOptions,
) -> Vec<Difference> {
    let mut diffs = Vec::new();
    Comparator::new(opts).nodes(path, from, to, &mut diffs);
    diffs
}

fn apply_chroot(docs: &[Document], path: &str, side: Side) -> Result<Vec<Document>, ChrootError> {
    docs.iter()
        .map(|doc| {
            doc.chroot(path).ok_or_else(|| ChrootError {
                path: path.to_string(),
                side,
            })
        })
        .collect()
}

fn set_document_index(diffs: &mut [Difference], index: usize) {
    for diff in diffs {
        diff.document_index = index;
    }
}

fn document_path(multi: bool, index: usize) -> Path {
    if multi {
        Path::from_elements(vec![PathElement::index(index)])
    } else {
        Path::root()
    }
}

/// Splits a list into identifier-owning elements in order and the rest
/// with their original indices. The first element claiming a value
/// owns it; later duplicates fall into the rest.
fn partition_by_identifier<'n>(
    items: &'n [Node],
    field: &str,
) -> (Vec<(String, &'n Node)>, Vec<(usize, &'n Node)>) {
    let mut named: Vec<(String, &Node)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut rest: Vec<(usize, &Node)> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match element_identifier(item, field) {
            Some(id) if !seen.contains(&id) => {
                seen.insert(id.clone());
                named.push((id, item));
            }
            _ => rest.push((i, item)),
        }
    }
    (named, rest)
}

struct Comparator<'a> {
    opts: &'a CompareOptions,
}

impl<'a> Comparator<'a> {
    fn new(opts: &'a CompareOptions) -> Self {
        Comparator { opts }
    }

    /// Pairs up the documents of two streams and compares each pair.
    /// Kubernetes-shaped streams match by resource identity; everything
    /// else pairs positionally and must agree on document count.
    fn compare_documents(
        &self,
        from: &[Document],
        to: &[Document],
    ) -> Result<Vec<Difference>, CompareError> {
        let mut diffs = Vec::new();

        if self.opts.detect_kubernetes
            && (from.iter().any(|d| is_kubernetes_resource(d.root()))
                || to.iter().any(|d| is_kubernetes_resource(d.root())))
        {
            self.kubernetes_documents(from, to, &mut diffs);
            return Ok(diffs);
        }

        if from.len() != to.len() {
            return Err(CompareError::DocumentCount {
                from: from.len(),
                to: to.len(),
            });
        }

        for (i, (from_doc, to_doc)) in from.iter().zip(to.iter()).enumerate() {
            let start = diffs.len();
            self.nodes(
                &Path::root(),
                Some(from_doc.root()),
                Some(to_doc.root()),
                &mut diffs,
            );
            set_document_index(&mut diffs[start..], i);
        }
        Ok(diffs)
    }

    fn nodes(
        &self,
        path: &Path,
        from: Option<&Node>,
        to: Option<&Node>,
        diffs: &mut Vec<Difference>,
    ) {
        match (from, to) {
            (None, None) => {}
            (None, Some(to)) => diffs.push(Difference::added(path.clone(), to.clone())),
            (Some(from), None) => {
                // A value degrading to nothing reads as a change to
                // null; structural removals are reported by the map
                // and list walks instead.
                if !self.opts.ignore_value_changes {
                    diffs.push(Difference::modified(path.clone(), from.clone(), Node::Null));
                }
            }
            (Some(from), Some(to)) => self.present_nodes(path, from, to, diffs),
        }
    }

    fn present_nodes(&self, path: &Path, from: &Node, to: &Node, diffs: &mut Vec<Difference>) {
        match (from, to) {
            (Node::Map(from_map), Node::Map(to_map)) => self.maps(path, from_map, to_map, diffs),
            (Node::List(from_items), Node::List(to_items)) => {
                self.lists(path, from_items, to_items, diffs)
            }
            _ => {
                if !self.opts.ignore_value_changes && !values_equal(from, to, self.opts) {
                    diffs.push(Difference::modified(path.clone(), from.clone(), to.clone()));
                }
            }
        }
    }

    /// Two passes in stored key order: recursion and removals while
    /// walking the left side, then additions while walking the right.
    fn maps(&self, path: &Path, from: &OrderedMap, to: &OrderedMap, diffs: &mut Vec<Difference>) {
        for (key, from_value) in from.iter() {
            let child = path.with(PathElement::field(key));
            match to.get(key) {
                Some(to_value) => self.present_nodes(&child, from_value, to_value, diffs),
                None => diffs.push(Difference::removed(child, from_value.clone())),
            }
        }
        for (key, to_value) in to.iter() {
            if !from.contains_key(key) {
                diffs.push(Difference::added(
                    path.with(PathElement::field(key)),
                    to_value.clone(),
                ));
            }
        }
    }

    fn lists(&self, path: &Path, from: &[Node], to: &[Node], diffs: &mut Vec<Difference>) {
        match select_list_strategy(from, to, self.opts) {
            ListStrategy::Identifier(field) => {
                self.identified_lists(path, from, to, &field, diffs)
            }
            ListStrategy::Unordered => {
                let from: Vec<(usize, &Node)> = from.iter().enumerate().collect();
                let to: Vec<(usize, &Node)> = to.iter().enumerate().collect();
                self.unordered_lists(path, &from, &to, diffs);
            }
            ListStrategy::Positional => self.positional_lists(path, from, to, diffs),
        }
    }

    /// Matches elements by identifier value. Matched pairs recurse
    /// under the identifier's string form; one-sided elements report
    /// in full at the list's own path; the non-identified leftovers
    /// match as a set under their original indices.
    fn identified_lists(
        &self,
        path: &Path,
        from: &[Node],
        to: &[Node],
        field: &str,
        diffs: &mut Vec<Difference>,
    ) {
        let (from_named, from_rest) = partition_by_identifier(from, field);
        let (to_named, to_rest) = partition_by_identifier(to, field);

        let to_by_id: HashMap<&str, &Node> = to_named
            .iter()
            .map(|(id, item)| (id.as_str(), *item))
            .collect();
        let from_ids: HashSet<&str> = from_named.iter().map(|(id, _)| id.as_str()).collect();

        for (id, from_item) in &from_named {
            match to_by_id.get(id.as_str()).copied() {
                Some(to_item) => self.present_nodes(
                    &path.with(PathElement::entry(id.clone())),
                    from_item,
                    to_item,
                    diffs,
                ),
                None => diffs.push(Difference::removed(path.clone(), (*from_item).clone())),
            }
        }
        for (id, to_item) in &to_named {
            if !from_ids.contains(id.as_str()) {
                diffs.push(Difference::added(path.clone(), (*to_item).clone()));
            }
        }

        if !self.opts.ignore_order_changes {
            let to_ids: HashSet<&str> = to_named.iter().map(|(id, _)| id.as_str()).collect();
            let common_from: Vec<&str> = from_named
                .iter()
                .map(|(id, _)| id.as_str())
                .filter(|id| to_ids.contains(id))
                .collect();
            let common_to: Vec<&str> = to_named
                .iter()
                .map(|(id, _)| id.as_str())
                .filter(|id| from_ids.contains(id))
                .collect();
            if common_from.len() > 1 && common_from != common_to {
                let as_list = |ids: &[&str]| {
                    Node::List(ids.iter().map(|id| Node::String((*id).to_string())).collect())
                };
                diffs.push(Difference::order_changed(
                    path.clone(),
                    as_list(&common_from),
                    as_list(&common_to),
                ));
            }
        }

        self.unordered_lists(path, &from_rest, &to_rest, diffs);
    }

    /// Greedy set matching: each left item claims the first unclaimed
    /// equal right item. Unclaimed items report under their own side's
    /// original index, removals first.
    fn unordered_lists(
        &self,
        path: &Path,
        from: &[(usize, &Node)],
        to: &[(usize, &Node)],
        diffs: &mut Vec<Difference>,
    ) {
        let mut claimed = vec![false; to.len()];
        for &(from_index, from_item) in from {
            let mut matched = None;
            for (j, &(_, to_item)) in to.iter().enumerate() {
                if !claimed[j] && values_equal(from_item, to_item, self.opts) {
                    matched = Some(j);
                    break;
                }
            }
            match matched {
                Some(j) => claimed[j] = true,
                None => diffs.push(Difference::removed(
                    path.with(PathElement::index(from_index)),
                    from_item.clone(),
                )),
            }
        }
        for (j, &(to_index, to_item)) in to.iter().enumerate() {
            if !claimed[j] {
                diffs.push(Difference::added(
                    path.with(PathElement::index(to_index)),
                    to_item.clone(),
                ));
            }
        }
    }

    fn positional_lists(&self, path: &Path, from: &[Node], to: &[Node], diffs: &mut Vec<Difference>) {
        if self.order_changed(path, from, to, diffs) {
            return;
        }
        for i in 0..from.len().max(to.len()) {
            let child = path.with(PathElement::index(i));
            match (from.get(i), to.get(i)) {
                (Some(from_item), Some(to_item)) => {
                    self.present_nodes(&child, from_item, to_item, diffs)
                }
                (Some(from_item), None) => {
                    diffs.push(Difference::removed(child, from_item.clone()))
                }
                (None, Some(to_item)) => diffs.push(Difference::added(child, to_item.clone())),
                (None, None) => {}
            }
        }
    }

    /// Emits one order change when two equal-length lists hold the
    /// same values in different positions, and nothing otherwise.
    fn order_changed(
        &self,
        path: &Path,
        from: &[Node],
        to: &[Node],
        diffs: &mut Vec<Difference>,
    ) -> bool {
        if from.len() != to.len() || from.len() < 2 {
            return false;
        }
        let positionally_equal = from
            .iter()
            .zip(to.iter())
            .all(|(from_item, to_item)| values_equal(from_item, to_item, self.opts));
        if positionally_equal {
            return false;
        }
        let mut claimed = vec![false; to.len()];
        for from_item in from {
            let mut matched = false;
            for (j, to_item) in to.iter().enumerate() {
                if !claimed[j] && values_equal(from_item, to_item, self.opts) {
                    claimed[j] = true;
                    matched = true;
                    break;
                }
            }
            if !matched {
                return false;
            }
        }
        diffs.push(Difference::order_changed(
            path.clone(),
            Node::List(from.to_vec()),
            Node::List(to.to_vec()),
        ));
        true
    }

    /// Document-level identity matching for Kubernetes streams. Paths
    /// gain the document's positional index when more than one document
    /// exists on either side.
    fn kubernetes_documents(
        &self,
        from: &[Document],
        to: &[Document],
        diffs: &mut Vec<Difference>,
    ) {
        let multi = from.len() > 1 || to.len() > 1;

        let mut to_index: HashMap<String, usize> = HashMap::new();
        for (j, doc) in to.iter().enumerate() {
            if let Some(id) = kubernetes_identifier(doc.root()) {
                to_index.entry(id).or_insert(j);
            }
        }

        let mut claimed = vec![false; to.len()];
        let mut from_rest: Vec<(usize, &Document)> = Vec::new();

        for (i, doc) in from.iter().enumerate() {
            let Some(id) = kubernetes_identifier(doc.root()) else {
                from_rest.push((i, doc));
                continue;
            };
            match to_index.get(&id).copied() {
                Some(j) if !claimed[j] => {
                    claimed[j] = true;
                    let start = diffs.len();
                    self.nodes(
                        &document_path(multi, i),
                        Some(doc.root()),
                        Some(to[j].root()),
                        diffs,
                    );
                    set_document_index(&mut diffs[start..], i);
                }
                _ => {
                    let mut diff =
                        Difference::removed(document_path(multi, i), doc.root().clone());
                    diff.document_index = i;
                    diffs.push(diff);
                }
            }
        }

        let mut to_rest: Vec<(usize, &Document)> = Vec::new();
        for (j, doc) in to.iter().enumerate() {
            if claimed[j] {
                continue;
            }
            if kubernetes_identifier(doc.root()).is_some() {
                let mut diff = Difference::added(document_path(multi, j), doc.root().clone());
                diff.document_index = j;
                diffs.push(diff);
            } else {
                to_rest.push((j, doc));
            }
        }

        // Documents with no identity pair up positionally among
        // themselves.
        let pairs = from_rest.len().min(to_rest.len());
        for k in 0..pairs {
            let (i, from_doc) = from_rest[k];
            let (_, to_doc) = to_rest[k];
            let start = diffs.len();
            self.nodes(
                &document_path(multi, i),
                Some(from_doc.root()),
                Some(to_doc.root()),
                diffs,
            );
            set_document_index(&mut diffs[start..], i);
        }
        for &(i, doc) in &from_rest[pairs..] {
            let mut diff = Difference::removed(document_path(multi, i), doc.root().clone());
            diff.document_index = i;
            diffs.push(diff);
        }
        for &(j, doc) in &to_rest[pairs..] {
            let mut diff = Difference::added(document_path(multi, j), doc.root().clone());
            diff.document_index = j;
            diffs.push(diff);
        }
    }
}
