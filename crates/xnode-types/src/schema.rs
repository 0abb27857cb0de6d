use std::fmt;

/// A type reference carried by a `StartObject` node.
///
/// Types are identified by an XML namespace plus a local name, which is
/// all the streaming layer needs. Resolving them to real runtime types is
/// the job of the object builder further down the pipeline.
///
/// Displayed as `{namespace}name`, or just `name` when the namespace is
/// empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XamlType {
    pub namespace: String,
    pub name: String,
}

impl XamlType {
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for XamlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.name)
        }
    }
}

/// A member reference carried by a `StartMember` node.
///
/// Ordinary properties have a declaring type; directives (`x:Key`,
/// `x:Name`, the implicit `_Items` collection) do not, and set
/// `is_directive`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XamlMember {
    pub name: String,
    pub declaring_type: Option<XamlType>,
    pub is_directive: bool,
}

impl XamlMember {
    /// A property declared on `declaring_type`.
    #[must_use]
    pub fn new(declaring_type: XamlType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: Some(declaring_type),
            is_directive: false,
        }
    }

    /// A directive member with no declaring type.
    #[must_use]
    pub fn directive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            is_directive: true,
        }
    }
}

impl fmt::Display for XamlMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declaring_type {
            Some(ty) => write!(f, "{}.{}", ty.name, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// An `xmlns` mapping announced ahead of the object that uses it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamespaceDeclaration {
    pub prefix: String,
    pub namespace: String,
}

impl NamespaceDeclaration {
    #[must_use]
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for NamespaceDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "xmlns=\"{}\"", self.namespace)
        } else {
            write!(f, "xmlns:{}=\"{}\"", self.prefix, self.namespace)
        }
    }
}
