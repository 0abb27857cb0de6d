#![warn(clippy::pedantic)]

pub mod error;
pub mod node_type;
pub mod line_info;
pub mod schema;
pub mod value;
pub mod node;

pub use error::TypeError;
pub use line_info::LineInfo;
pub use node::Node;
pub use node_type::NodeType;
pub use schema::{NamespaceDeclaration, XamlMember, XamlType};
pub use value::NodeValue;
