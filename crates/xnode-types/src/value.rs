use std::fmt;

/// The payload of a `Value` node.
///
/// Markup text arrives as strings, but producers that already know the
/// primitive type (an object reader walking a live graph, for example)
/// can hand it over typed.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl NodeValue {
    /// The text payload, if this is a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for NodeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for NodeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for NodeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}
