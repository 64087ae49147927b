//! Declaration nodes captured from the syntax tree
//!
//! Captured subtrees are copied out of the tree-sitter tree so they outlive
//! the parse and can be regenerated after the tree is dropped.

use importsym_core::{DeclKind, Location};
use tree_sitter::Node;

/// Node kinds kept as a single token with their source text
const ATOMIC_KINDS: &[&str] = &[
    "string_literal",
    "concatenated_string",
    "char_literal",
    "number_literal",
    "system_lib_string",
    "primitive_type",
];

/// Owned copy of a syntax subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Grammar kind, e.g. `struct_specifier` or `;`
    pub kind: String,
    /// Token text for leaves
    pub text: Option<String>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn branch(kind: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: kind.into(),
            text: None,
            children,
        }
    }

    /// Copy a tree-sitter node and everything below it. Comments are dropped.
    pub fn from_ts(node: Node<'_>, source: &str) -> Self {
        if node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind()) {
            let text = node.utf8_text(source.as_bytes()).unwrap_or("");
            return Self::leaf(node.kind(), text);
        }

        let mut cursor = node.walk();
        let children = node
            .children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .map(|child| Self::from_ts(child, source))
            .collect();
        Self::branch(node.kind(), children)
    }

    pub fn is_leaf(&self) -> bool {
        self.text.is_some()
    }
}

/// A captured declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `struct tag { ... }`
    Struct {
        name: String,
        location: Location,
        node: SyntaxNode,
    },
    /// `enum tag { ... }`
    Enum {
        name: String,
        location: Location,
        node: SyntaxNode,
    },
    /// One declarator of a `typedef`
    Typedef {
        name: String,
        location: Location,
        /// Qualifiers and the aliased type, in source order
        specifiers: Vec<SyntaxNode>,
        declarator: SyntaxNode,
    },
    /// Type name carrying its own declarator identifier
    TypeName {
        name: String,
        location: Location,
        node: SyntaxNode,
    },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Struct { name, .. }
            | Declaration::Enum { name, .. }
            | Declaration::Typedef { name, .. }
            | Declaration::TypeName { name, .. } => name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Struct { .. } => DeclKind::Struct,
            Declaration::Enum { .. } => DeclKind::Enum,
            Declaration::Typedef { .. } => DeclKind::Typedef,
            Declaration::TypeName { .. } => DeclKind::TypeName,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Declaration::Struct { location, .. }
            | Declaration::Enum { location, .. }
            | Declaration::Typedef { location, .. }
            | Declaration::TypeName { location, .. } => location,
        }
    }
}

/// Identifier introduced by a (possibly nested) declarator
pub fn declarator_name(node: Node<'_>, source: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" | "identifier" | "field_identifier" | "primitive_type" => {
            return node.utf8_text(source.as_bytes()).ok().map(str::to_string);
        }
        _ => {}
    }

    if let Some(inner) = node.child_by_field_name("declarator") {
        return declarator_name(inner, source);
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(|child| declarator_name(child, source))
}
