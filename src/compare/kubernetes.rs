//! Kubernetes resource identity.

use crate::node::{Node, OrderedMap};

/// Returns true if the node looks like a Kubernetes resource.
pub fn is_kubernetes_resource(node: &Node) -> bool {
    kubernetes_identifier(node).is_some()
}

/// Computes the identity of a Kubernetes-shaped document:
/// `apiVersion:kind:namespace/name`, or `apiVersion:kind:name` for
/// cluster-scoped resources. Returns None for anything else.
pub fn kubernetes_identifier(node: &Node) -> Option<String> {
    let map = node.as_map()?;
    let api_version = map.get("apiVersion")?.as_str()?;
    let kind = map.get("kind")?.as_str()?;
    let metadata = map.get("metadata")?.as_map()?;
    let name = resource_name(metadata)?;
    Some(match metadata.get("namespace") {
        Some(namespace) if !namespace.is_null() => {
            format!("{}:{}:{}/{}", api_version, kind, namespace, name)
        }
        _ => format!("{}:{}:{}", api_version, kind, name),
    })
}

/// A resource is named by `metadata.name`, or by
/// `metadata.generateName` only when no `name` key exists at all. An
/// explicit null name never falls back.
fn resource_name(metadata: &OrderedMap) -> Option<String> {
    match metadata.get("name") {
        Some(name) if !name.is_null() => Some(name.to_string()),
        Some(_) => None,
        None => match metadata.get("generateName") {
            Some(generate_name) if !generate_name.is_null() => Some(generate_name.to_string()),
            _ => None,
        },
    }
}
