/// Errors raised by the node model itself.
///
/// The node types are plain data, so the only fallible operation at this
/// layer is turning an external name (from a manifest, a CLI flag, a test
/// fixture) back into a [`NodeType`](crate::NodeType).
///
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ TypeError (this crate)                       │
/// │   └── UnknownNodeType for unrecognized names │
/// └──────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A node type name did not match any known variant.
    ///
    /// Names are the snake_case forms returned by
    /// [`NodeType::as_str`](crate::NodeType::as_str).
    #[error("unknown node type: {name:?}")]
    UnknownNodeType { name: String },
}
