/// JSON node manifests.
///
/// A manifest is a flat list of nodes in stream order:
///
/// ```json
/// {
///   "nodes": [
///     { "kind": "namespace", "prefix": "", "namespace": "urn:ui" },
///     { "kind": "line_info", "line": 1, "column": 1 },
///     { "kind": "start_object", "namespace": "urn:ui", "name": "Button" },
///     { "kind": "start_member", "type": "Button", "namespace": "urn:ui", "name": "Content" },
///     { "kind": "value", "value": "OK" },
///     { "kind": "end_member" },
///     { "kind": "end_object" }
///   ]
/// }
/// ```
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────────┐
/// │ Kind         │ Fields                                               │
/// ├──────────────┼──────────────────────────────────────────────────────┤
/// │ namespace    │ namespace, prefix (default "")                       │
/// │ start_object │ name, namespace (default "")                         │
/// │ get_object   │ -                                                    │
/// │ end_object   │ -                                                    │
/// │ start_member │ name, and either type (+ namespace) or directive     │
/// │ end_member   │ -                                                    │
/// │ value        │ value: null, bool, integer, float or string          │
/// │ line_info    │ line, column                                         │
/// └──────────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// The end-of-stream marker is implied and must not appear in a manifest.
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use xnode_types::{LineInfo, NamespaceDeclaration, Node, NodeValue, XamlMember, XamlType};

// ── Manifest serde types ──────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct Manifest {
    nodes: Vec<ManifestNode>,
}

#[derive(serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ManifestNode {
    Namespace {
        #[serde(default)]
        prefix: String,
        namespace: String,
    },
    StartObject {
        #[serde(default)]
        namespace: String,
        name: String,
    },
    GetObject,
    EndObject,
    StartMember {
        name: String,
        /// Local name of the declaring type.
        #[serde(rename = "type")]
        declaring_type: Option<String>,
        #[serde(default)]
        namespace: String,
        #[serde(default)]
        directive: bool,
    },
    EndMember,
    Value {
        value: serde_json::Value,
    },
    LineInfo {
        line: u32,
        column: u32,
    },
}

impl ManifestNode {
    fn into_node(self) -> Result<Node> {
        let node = match self {
            Self::Namespace { prefix, namespace } => {
                Node::NamespaceDeclaration(Arc::new(NamespaceDeclaration::new(prefix, namespace)))
            }
            Self::StartObject { namespace, name } => {
                Node::StartObject(Arc::new(XamlType::new(namespace, name)))
            }
            Self::GetObject => Node::GetObject,
            Self::EndObject => Node::EndObject,
            Self::StartMember {
                name,
                declaring_type,
                namespace,
                directive,
            } => {
                let member = match (directive, declaring_type) {
                    (true, _) => XamlMember::directive(name),
                    (false, Some(ty)) => XamlMember::new(XamlType::new(namespace, ty), name),
                    (false, None) => bail!("member `{name}` needs a `type` or `\"directive\": true`"),
                };
                Node::StartMember(Arc::new(member))
            }
            Self::EndMember => Node::EndMember,
            Self::Value { value } => Node::Value(Arc::new(scalar(value)?)),
            Self::LineInfo { line, column } => Node::LineInfo(LineInfo::new(line, column)),
        };
        Ok(node)
    }
}

fn scalar(value: serde_json::Value) -> Result<NodeValue> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(NodeValue::Null),
        Value::Bool(b) => Ok(NodeValue::Bool(b)),
        Value::String(s) => Ok(NodeValue::Text(s)),
        Value::Number(n) => n
            .as_i64()
            .map(NodeValue::Int)
            .or_else(|| n.as_f64().map(NodeValue::Float))
            .ok_or_else(|| anyhow!("number {n} is out of range")),
        other @ (Value::Array(_) | Value::Object(_)) => {
            bail!("value must be a JSON scalar, got {other}")
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse manifest JSON text into nodes.
///
/// # Errors
///
/// Fails on malformed JSON, unknown kinds, or invalid node fields; the
/// error names the offending node index.
pub fn parse(text: &str) -> Result<Vec<Node>> {
    let manifest: Manifest = serde_json::from_str(text).context("invalid manifest JSON")?;
    manifest
        .nodes
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_node().with_context(|| format!("node {index}")))
        .collect()
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read or does not parse.
pub fn load(path: &Path) -> Result<Vec<Node>> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_kind() {
        let nodes = parse(
            r#"{ "nodes": [
                { "kind": "namespace", "prefix": "x", "namespace": "urn:x" },
                { "kind": "line_info", "line": 2, "column": 4 },
                { "kind": "start_object", "namespace": "urn:ui", "name": "Button" },
                { "kind": "start_member", "type": "Button", "namespace": "urn:ui", "name": "Content" },
                { "kind": "value", "value": 3 },
                { "kind": "end_member" },
                { "kind": "start_member", "name": "Key", "directive": true },
                { "kind": "value", "value": "k" },
                { "kind": "end_member" },
                { "kind": "get_object" },
                { "kind": "end_object" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(nodes.len(), 11);
        assert_eq!(nodes[1], Node::LineInfo(LineInfo::new(2, 4)));
        assert_eq!(nodes[3].to_string(), "StartMember Button.Content");
        assert_eq!(nodes[4].value().unwrap().as_ref(), &NodeValue::Int(3));
        assert!(nodes[6].member().unwrap().is_directive);
    }

    #[test]
    fn scalars_map_to_node_values() {
        assert_eq!(scalar(serde_json::json!(null)).unwrap(), NodeValue::Null);
        assert_eq!(scalar(serde_json::json!(true)).unwrap(), NodeValue::Bool(true));
        assert_eq!(scalar(serde_json::json!(1.5)).unwrap(), NodeValue::Float(1.5));
        assert!(scalar(serde_json::json!([1])).is_err());
    }

    #[test]
    fn member_without_owner_is_rejected() {
        let err = parse(r#"{ "nodes": [ { "kind": "start_member", "name": "Orphan" } ] }"#).unwrap_err();
        assert!(format!("{err:#}").contains("node 0"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(parse(r#"{ "nodes": [ { "kind": "end_of_stream" } ] }"#).is_err());
    }
}
