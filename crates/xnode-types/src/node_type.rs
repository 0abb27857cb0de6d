use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

// ── Macro for name-mapped enum boilerplate ────────────────────────────
//
// Node types travel through manifests and log lines by name. Each variant
// is mapped to one snake_case string, with the conversion pair
// (as_str / from_name) generated here so the table lives in one place.

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( Self::$variant ),+];

            /// The stable snake_case name of this variant.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// Look a variant up by its snake_case name.
            ///
            /// Returns `Err(TypeError::UnknownNodeType)` if the name doesn't
            /// match any known variant.
            pub fn from_name(name: &str) -> Result<Self, TypeError> {
                match name {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(TypeError::UnknownNodeType {
                        name: other.to_string(),
                    }),
                }
            }
        }
    };
}

named_enum! {
    /// The public kind of a node as seen through a reader cursor.
    ///
    /// Stream markers (line info, start of stream, end of stream) have no
    /// kind of their own and report `None`; use
    /// [`Node::is_eof`](crate::Node::is_eof) and friends to tell them apart.
    ///
    /// ```text
    /// ┌──────────────────────┬─────────────────────────┐
    /// │ Name                 │ Variant                 │
    /// ├──────────────────────┼─────────────────────────┤
    /// │ none                 │ None                    │
    /// │ start_object         │ StartObject             │
    /// │ get_object           │ GetObject               │
    /// │ end_object           │ EndObject               │
    /// │ start_member         │ StartMember             │
    /// │ end_member           │ EndMember               │
    /// │ value                │ Value                   │
    /// │ namespace            │ NamespaceDeclaration    │
    /// └──────────────────────┴─────────────────────────┘
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum NodeType {
        None = "none",
        StartObject = "start_object",
        GetObject = "get_object",
        EndObject = "end_object",
        StartMember = "start_member",
        EndMember = "end_member",
        Value = "value",
        NamespaceDeclaration = "namespace",
    }
}

impl NodeType {
    /// Whether this kind opens a scope that a matching end node closes.
    #[must_use]
    pub fn opens_scope(self) -> bool {
        matches!(self, Self::StartObject | Self::GetObject | Self::StartMember)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
