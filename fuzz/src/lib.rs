//! Shared `Arbitrary` node model for the fuzz targets.

use std::sync::Arc;

use arbitrary::Arbitrary;
use xnode_types::{LineInfo, NamespaceDeclaration, Node, NodeValue, XamlMember, XamlType};

#[derive(Debug, Arbitrary)]
pub enum FuzzNode {
    Namespace { prefix: String, namespace: String },
    StartObject { name: String },
    GetObject,
    EndObject,
    StartMember { owner: String, name: String, directive: bool },
    EndMember,
    Int(i64),
    Text(String),
    LineInfo { line: u32, column: u32 },
}

impl FuzzNode {
    pub fn into_node(self) -> Node {
        match self {
            FuzzNode::Namespace { prefix, namespace } => {
                Node::NamespaceDeclaration(Arc::new(NamespaceDeclaration::new(prefix, namespace)))
            }
            FuzzNode::StartObject { name } => Node::StartObject(Arc::new(XamlType::new("urn:fuzz", name))),
            FuzzNode::GetObject => Node::GetObject,
            FuzzNode::EndObject => Node::EndObject,
            FuzzNode::StartMember { owner, name, directive } => {
                let member = if directive {
                    XamlMember::directive(name)
                } else {
                    XamlMember::new(XamlType::new("urn:fuzz", owner), name)
                };
                Node::StartMember(Arc::new(member))
            }
            FuzzNode::EndMember => Node::EndMember,
            FuzzNode::Int(v) => Node::Value(Arc::new(NodeValue::Int(v))),
            FuzzNode::Text(s) => Node::Value(Arc::new(NodeValue::Text(s))),
            FuzzNode::LineInfo { line, column } => Node::LineInfo(LineInfo::new(line, column)),
        }
    }
}

pub fn nodes(input: Vec<FuzzNode>) -> Vec<Node> {
    input.into_iter().map(FuzzNode::into_node).collect()
}

pub fn without_line_info(nodes: &[Node]) -> Vec<Node> {
    nodes.iter().filter(|n| !n.is_line_info()).cloned().collect()
}
