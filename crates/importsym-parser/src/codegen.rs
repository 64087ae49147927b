//! Canonical C regeneration
//!
//! Declarations are written back token by token with normalized spacing.
//! Struct and enum bodies get one member per line, indented two spaces per
//! nesting level, so the output does not depend on the header's layout.

use crate::ast::{Declaration, SyntaxNode};

const INDENT: &str = "  ";

/// C code generator for captured declarations
#[derive(Debug, Default, Clone, Copy)]
pub struct CGenerator;

impl CGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Regenerate a declaration without its trailing `;`
    pub fn generate(&self, decl: &Declaration) -> String {
        let mut writer = Writer::default();
        match decl {
            Declaration::Struct { node, .. }
            | Declaration::Enum { node, .. }
            | Declaration::TypeName { node, .. } => writer.node(node, ""),
            Declaration::Typedef {
                specifiers,
                declarator,
                ..
            } => {
                writer.token("typedef", "type_definition");
                for specifier in specifiers {
                    writer.node(specifier, "type_definition");
                }
                writer.node(declarator, "type_definition");
            }
        }
        writer.out
    }
}

enum Prev {
    LineStart,
    Token { text: String, parent: String },
}

struct Writer {
    out: String,
    depth: usize,
    prev: Prev,
}

impl Default for Writer {
    fn default() -> Self {
        Self {
            out: String::new(),
            depth: 0,
            prev: Prev::LineStart,
        }
    }
}

impl Writer {
    fn node(&mut self, node: &SyntaxNode, parent: &str) {
        if let Some(text) = &node.text {
            self.token(text, parent);
            return;
        }

        match node.kind.as_str() {
            "field_declaration_list" => self.block(node, false),
            "enumerator_list" => self.block(node, true),
            _ => {
                for child in &node.children {
                    self.node(child, &node.kind);
                }
            }
        }
    }

    fn block(&mut self, node: &SyntaxNode, comma_separated: bool) {
        let members: Vec<&SyntaxNode> = node
            .children
            .iter()
            .filter(|c| !matches!(c.kind.as_str(), "{" | "}" | ","))
            .collect();

        self.newline();
        self.token("{", &node.kind);
        self.depth += 1;
        for (i, member) in members.iter().enumerate() {
            self.newline();
            self.node(member, &node.kind);
            if comma_separated && i + 1 < members.len() {
                self.token(",", &node.kind);
            }
        }
        self.depth -= 1;
        self.newline();
        self.token("}", &node.kind);
    }

    fn token(&mut self, text: &str, parent: &str) {
        if text.is_empty() {
            return;
        }
        if needs_space(&self.prev, text, parent) {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.prev = Prev::Token {
            text: text.to_string(),
            parent: parent.to_string(),
        };
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.prev = Prev::LineStart;
    }
}

fn needs_space(prev: &Prev, text: &str, parent: &str) -> bool {
    let Prev::Token {
        text: prev_text,
        parent: prev_parent,
    } = prev
    else {
        return false;
    };

    if matches!(text, "," | ";" | ")" | "]" | "[" | "." | "->") {
        return false;
    }
    if matches!(prev_text.as_str(), "(" | "[" | "." | "->") {
        return false;
    }
    if is_prefix_operator(prev_text, prev_parent) && parent != "type_qualifier" {
        return would_merge(prev_text, text);
    }
    if text == "(" {
        let follows_operand = is_word(prev_text) || matches!(prev_text.as_str(), ")" | "]");
        return !follows_operand
            || matches!(
                parent,
                "parenthesized_declarator" | "abstract_parenthesized_declarator"
            );
    }
    true
}

fn is_prefix_operator(text: &str, parent: &str) -> bool {
    match parent {
        "pointer_declarator" | "abstract_pointer_declarator" => text == "*",
        "unary_expression" | "pointer_expression" => {
            matches!(text, "-" | "+" | "!" | "~" | "*" | "&")
        }
        _ => false,
    }
}

/// Whether gluing `next` onto a prefix operator lexes as a different token,
/// e.g. `-` `-1` read back as `--1`
fn would_merge(prefix: &str, next: &str) -> bool {
    match prefix {
        "-" => next.starts_with('-'),
        "+" => next.starts_with('+'),
        "&" => next.starts_with('&'),
        _ => false,
    }
}

fn is_word(text: &str) -> bool {
    text.chars()
        .next()
        .map(|c| c.is_alphanumeric() || matches!(c, '_' | '"' | '\''))
        .unwrap_or(false)
}
