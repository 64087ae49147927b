//! Tree-sitter based parser for C language

use importsym_core::{Error, Location, Result};
use tree_sitter::{Node, Parser as TSParser, Tree};
use tracing::debug;

use crate::preprocessor::LineMap;

/// Tree-sitter parser loaded with the C grammar
pub struct CParser {
    parser: TSParser,
}

impl CParser {
    /// Create a new Tree-sitter parser for C
    pub fn new() -> Result<Self> {
        let mut parser = TSParser::new();
        parser
            .set_language(&tree_sitter_c::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("failed to load C grammar: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a whole translation unit.
    ///
    /// The grammar recovers from syntax it does not understand by inserting
    /// error nodes; any such node fails the parse.
    pub fn parse(&mut self, source: String, filename: &str) -> Result<SyntaxTree> {
        self.parse_mapped(source, filename, LineMap::default())
    }

    /// Parse preprocessed output, reporting positions in the source headers.
    ///
    /// Rows `lines` cannot place are reported against `filename`.
    pub fn parse_mapped(&mut self, source: String, filename: &str, lines: LineMap) -> Result<SyntaxTree> {
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| Error::Parse("Failed to parse source".into()))?;

        let tree = SyntaxTree {
            tree,
            source,
            filename: filename.to_string(),
            lines,
        };

        if let Some(node) = tree.first_error() {
            let location = tree.location_of(node);
            let near: String = tree.text(node).chars().take(40).collect();
            return Err(Error::Parse(if node.is_missing() {
                format!("{}: expected '{}'", location, node.kind())
            } else {
                format!("{}: syntax not understood near '{}'", location, near.trim())
            }));
        }

        debug!(
            "Parsed {} ({} bytes, {} top-level nodes)",
            tree.filename,
            tree.source.len(),
            tree.root().named_child_count()
        );
        Ok(tree)
    }
}

/// Parsed compilation unit together with the text it was built from
pub struct SyntaxTree {
    tree: Tree,
    source: String,
    filename: String,
    lines: LineMap,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Source text spanned by a node
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    pub fn location_of(&self, node: Node<'_>) -> Location {
        let pos = node.start_position();
        match self.lines.origin(pos.row) {
            Some((file, line)) => Location::new(file, line, pos.column as u32),
            None => Location::new(self.filename.as_str(), pos.row as u32 + 1, pos.column as u32),
        }
    }

    /// First error or missing node in document order
    pub fn first_error(&self) -> Option<Node<'_>> {
        fn find(node: Node<'_>) -> Option<Node<'_>> {
            if node.is_error() || node.is_missing() {
                return Some(node);
            }
            if !node.has_error() {
                return None;
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
            children.into_iter().find_map(find)
        }

        find(self.root())
    }
}
