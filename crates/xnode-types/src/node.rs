use std::fmt;
use std::sync::Arc;

use crate::line_info::LineInfo;
use crate::node_type::NodeType;
use crate::schema::{NamespaceDeclaration, XamlMember, XamlType};
use crate::value::NodeValue;

/// One step of a markup object event stream.
///
/// `Node` is the unit every buffer, queue and reader in this workspace
/// moves around. It is immutable once built. Payloads sit behind `Arc` so
/// cloning a node is a reference-count bump, and a node can be shared by
/// a replay list, a queue and a background hand-off buffer at the same
/// time, across threads.
///
/// ```text
/// ┌──────────────────────┬─────────────────────────┬───────────────┐
/// │ Variant              │ Payload                 │ node_type()   │
/// ├──────────────────────┼─────────────────────────┼───────────────┤
/// │ NamespaceDeclaration │ prefix + namespace      │ Namespace...  │
/// │ StartObject          │ XamlType                │ StartObject   │
/// │ GetObject            │ -                       │ GetObject     │
/// │ EndObject            │ -                       │ EndObject     │
/// │ StartMember          │ XamlMember              │ StartMember   │
/// │ EndMember            │ -                       │ EndMember     │
/// │ Value                │ NodeValue               │ Value         │
/// │ LineInfo             │ line + column (marker)  │ None          │
/// │ StartOfStream        │ - (marker)              │ None          │
/// │ EndOfStream          │ - (marker)              │ None          │
/// └──────────────────────┴─────────────────────────┴───────────────┘
/// ```
///
/// The two stream markers carry no payload, so every stream shares the
/// same constants ([`Node::START_OF_STREAM`], [`Node::END_OF_STREAM`]).
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    NamespaceDeclaration(Arc<NamespaceDeclaration>),
    StartObject(Arc<XamlType>),
    GetObject,
    EndObject,
    StartMember(Arc<XamlMember>),
    EndMember,
    Value(Arc<NodeValue>),
    LineInfo(LineInfo),
    StartOfStream,
    EndOfStream,
}

impl Node {
    pub const START_OF_STREAM: Node = Node::StartOfStream;
    pub const END_OF_STREAM: Node = Node::EndOfStream;

    /// The public kind of this node. Markers report [`NodeType::None`].
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::NamespaceDeclaration(_) => NodeType::NamespaceDeclaration,
            Self::StartObject(_) => NodeType::StartObject,
            Self::GetObject => NodeType::GetObject,
            Self::EndObject => NodeType::EndObject,
            Self::StartMember(_) => NodeType::StartMember,
            Self::EndMember => NodeType::EndMember,
            Self::Value(_) => NodeType::Value,
            Self::LineInfo(_) | Self::StartOfStream | Self::EndOfStream => NodeType::None,
        }
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    #[must_use]
    pub fn is_start_of_stream(&self) -> bool {
        matches!(self, Self::StartOfStream)
    }

    #[must_use]
    pub fn is_line_info(&self) -> bool {
        matches!(self, Self::LineInfo(_))
    }

    /// The type of a `StartObject` node.
    #[must_use]
    pub fn xaml_type(&self) -> Option<&Arc<XamlType>> {
        match self {
            Self::StartObject(ty) => Some(ty),
            _ => None,
        }
    }

    /// The member of a `StartMember` node.
    #[must_use]
    pub fn member(&self) -> Option<&Arc<XamlMember>> {
        match self {
            Self::StartMember(member) => Some(member),
            _ => None,
        }
    }

    /// The payload of a `Value` node.
    #[must_use]
    pub fn value(&self) -> Option<&Arc<NodeValue>> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The declaration of a `NamespaceDeclaration` node.
    #[must_use]
    pub fn namespace(&self) -> Option<&Arc<NamespaceDeclaration>> {
        match self {
            Self::NamespaceDeclaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// The position carried by a `LineInfo` marker.
    #[must_use]
    pub fn line_info(&self) -> Option<LineInfo> {
        match self {
            Self::LineInfo(info) => Some(*info),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamespaceDeclaration(decl) => write!(f, "NamespaceDeclaration {decl}"),
            Self::StartObject(ty) => write!(f, "StartObject {ty}"),
            Self::GetObject => f.write_str("GetObject"),
            Self::EndObject => f.write_str("EndObject"),
            Self::StartMember(member) => write!(f, "StartMember {member}"),
            Self::EndMember => f.write_str("EndMember"),
            Self::Value(value) => write!(f, "Value {value}"),
            Self::LineInfo(info) => write!(f, "LineInfo({},{})", info.line_number, info.line_position),
            Self::StartOfStream => f.write_str("StartOfStream"),
            Self::EndOfStream => f.write_str("EndOfStream"),
        }
    }
}
