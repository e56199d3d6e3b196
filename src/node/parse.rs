//! YAML front-end: byte streams in, document trees out.

use super::node::Node;
use super::ordered_map::OrderedMap;
use std::collections::HashSet;
use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlLoader};

/// Document wraps the root node of one document in a YAML stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Creates a document from a root node.
    pub fn new(root: Node) -> Self {
        Document { root }
    }

    /// Returns the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consumes the document, returning the root node.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Re-roots the document at a dotted path, if it resolves.
    pub fn chroot(&self, path: &str) -> Option<Document> {
        self.root.at_path(path).map(|node| Document {
            root: node.clone(),
        })
    }
}

/// ParseError reports malformed input, with a 1-based line and column
/// where the underlying scanner provides one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    line: Option<usize>,
    column: Option<usize>,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        ParseError {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the 1-based line of the error, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Returns the 1-based column of the error, if known.
    pub fn column(&self) -> Option<usize> {
        self.column
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses a byte stream holding zero or more `---`-separated YAML
/// documents into one tree per document.
pub fn parse(bytes: &[u8]) -> Result<Vec<Document>, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::new(format!("input is not valid UTF-8: {}", e)))?;
    let docs = YamlLoader::load_from_str(text).map_err(|e| {
        let marker = e.marker();
        ParseError::at(e.to_string(), marker.line(), marker.col() + 1)
    })?;
    Ok(docs
        .iter()
        .map(|yaml| Document::new(decode(yaml)))
        .collect())
}

fn decode(yaml: &Yaml) -> Node {
    match yaml {
        Yaml::Null => Node::Null,
        Yaml::Boolean(b) => Node::Bool(*b),
        Yaml::Integer(i) => Node::Int(*i),
        Yaml::Real(raw) => decode_real(raw),
        Yaml::String(s) => Node::String(s.clone()),
        Yaml::Array(items) => Node::List(items.iter().map(decode).collect()),
        Yaml::Hash(hash) => decode_mapping(hash),
        // An alias whose anchor never finished resolving (a cycle)
        // loads as BadValue; both collapse to null rather than recurse.
        Yaml::Alias(_) | Yaml::BadValue => Node::Null,
    }
}

/// Resolves the scanner's raw float spelling. Unparseable text keeps
/// its literal form as a string; this never fails.
fn decode_real(raw: &str) -> Node {
    match raw {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Node::Float(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Node::Float(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Node::Float(f64::NAN),
        _ => raw
            .parse::<f64>()
            .map(Node::Float)
            .unwrap_or_else(|_| Node::String(raw.to_string())),
    }
}

/// Decodes a mapping, expanding `<<` merge keys. Merged entries are
/// inserted only where no key exists yet; an explicit key overrides a
/// merged value while keeping the merged key's position.
fn decode_mapping(hash: &Hash) -> Node {
    let mut map = OrderedMap::with_capacity(hash.len());
    let mut merged: HashSet<String> = HashSet::new();

    for (key, value) in hash.iter() {
        if matches!(key, Yaml::String(s) if s == "<<") {
            merge_into(&mut map, &mut merged, &decode(value));
            continue;
        }
        let key = key_string(key);
        if merged.remove(&key) {
            map.insert(key, decode(value));
        } else if !map.contains_key(&key) {
            map.insert(key, decode(value));
        }
    }

    Node::Map(map)
}

/// Expands one merge source: a single map, or a sequence of maps merged
/// in order (earlier sources win). Any other source shape is ignored.
fn merge_into(map: &mut OrderedMap, merged: &mut HashSet<String>, source: &Node) {
    match source {
        Node::Map(entries) => {
            for (key, value) in entries.iter() {
                if !map.contains_key(key) {
                    map.insert(key, value.clone());
                    merged.insert(key.to_string());
                }
            }
        }
        Node::List(sources) => {
            for source in sources {
                if let Node::Map(_) = source {
                    merge_into(map, merged, source);
                }
            }
        }
        _ => {}
    }
}

fn key_string(key: &Yaml) -> String {
    match key {
        Yaml::String(s) => s.clone(),
        other => decode(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(input: &str) -> Node {
        let docs = parse(input.as_bytes()).unwrap();
        assert_eq!(docs.len(), 1);
        docs.into_iter()
            .next()
            .map(Document::into_root)
            .unwrap_or_default()
    }

    #[test]
    fn test_parse_scalar_types() {
        let root = single("int: 42\nfloat: 1.5\nbool: true\nstring: hello\nnothing: null\n");
        let map = root.as_map().unwrap();
        assert_eq!(map.get("int"), Some(&Node::Int(42)));
        assert_eq!(map.get("float"), Some(&Node::Float(1.5)));
        assert_eq!(map.get("bool"), Some(&Node::Bool(true)));
        assert_eq!(map.get("string"), Some(&Node::String("hello".into())));
        assert_eq!(map.get("nothing"), Some(&Node::Null));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let root = single("zebra: 1\napple: 2\nmango: 3\n");
        let keys: Vec<&str> = root.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_parse_multi_document_stream() {
        let docs = parse(b"a: 1\n---\nb: 2\n---\nc: 3\n").unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].root().as_map().unwrap().contains_key("b"));
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse(b"").unwrap().len(), 0);
    }

    #[test]
    fn test_parse_special_floats() {
        let root = single("up: .inf\ndown: -.inf\nweird: .nan\n");
        let map = root.as_map().unwrap();
        assert_eq!(map.get("up").and_then(Node::as_float), Some(f64::INFINITY));
        assert_eq!(
            map.get("down").and_then(Node::as_float),
            Some(f64::NEG_INFINITY)
        );
        assert!(map
            .get("weird")
            .and_then(Node::as_float)
            .is_some_and(f64::is_nan));
    }

    #[test]
    fn test_unparseable_real_falls_back_to_string() {
        assert_eq!(decode_real("1.2.3"), Node::String("1.2.3".into()));
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let root = single("1: a\ntrue: b\nnull: c\n");
        let map = root.as_map().unwrap();
        assert_eq!(map.get("1"), Some(&Node::String("a".into())));
        assert_eq!(map.get("true"), Some(&Node::String("b".into())));
        assert_eq!(map.get("null"), Some(&Node::String("c".into())));
    }

    #[test]
    fn test_merge_key_expansion() {
        let root = single("base: &base\n  a: 1\n  b: 2\nderived:\n  <<: *base\n  c: 3\n");
        let derived = root.at_path("derived").unwrap().as_map().unwrap();
        assert_eq!(derived.get("a"), Some(&Node::Int(1)));
        assert_eq!(derived.get("b"), Some(&Node::Int(2)));
        assert_eq!(derived.get("c"), Some(&Node::Int(3)));
        let keys: Vec<&str> = derived.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_key_explicit_wins() {
        let root = single("base: &base\n  a: 1\nderived:\n  <<: *base\n  a: 10\n");
        assert_eq!(root.at_path("derived.a"), Some(&Node::Int(10)));
    }

    #[test]
    fn test_merge_key_does_not_clobber_earlier_explicit() {
        let root = single("base: &base\n  a: 1\nderived:\n  a: 10\n  <<: *base\n");
        assert_eq!(root.at_path("derived.a"), Some(&Node::Int(10)));
    }

    #[test]
    fn test_merge_key_sequence_earlier_source_wins() {
        let input = "one: &one\n  a: 1\ntwo: &two\n  a: 2\n  b: 2\nderived:\n  <<: [*one, *two]\n";
        let root = single(input);
        assert_eq!(root.at_path("derived.a"), Some(&Node::Int(1)));
        assert_eq!(root.at_path("derived.b"), Some(&Node::Int(2)));
    }

    #[test]
    fn test_merge_key_non_map_source_is_ignored() {
        let root = single("derived:\n  <<: 5\n  a: 1\n");
        let derived = root.at_path("derived").unwrap().as_map().unwrap();
        assert_eq!(derived.len(), 1);
        assert_eq!(derived.get("a"), Some(&Node::Int(1)));
    }

    #[test]
    fn test_alias_cycle_resolves_to_null() {
        let root = single("a: &cycle\n  b: *cycle\n");
        assert_eq!(root.at_path("a.b"), Some(&Node::Null));
    }

    #[test]
    fn test_alias_shares_resolved_value() {
        let root = single("first: &anchor\n  x: 1\nsecond: *anchor\n");
        assert_eq!(root.at_path("first"), root.at_path("second"));
    }

    #[test]
    fn test_parse_error_carries_position() {
        let err = parse(b"key: \"unterminated\n").unwrap_err();
        assert!(err.line().is_some());
        assert!(err.column().is_some());
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = parse(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert_eq!(err.line(), None);
        assert!(err.message().contains("UTF-8"));
    }

    #[test]
    fn test_chroot() {
        let docs = parse(b"spec:\n  replicas: 3\n").unwrap();
        let rerooted = docs[0].chroot("spec").unwrap();
        assert_eq!(
            rerooted.root().at_path("replicas"),
            Some(&Node::Int(3))
        );
        assert!(docs[0].chroot("missing").is_none());
    }
}
