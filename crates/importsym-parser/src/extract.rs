//! Name-keyed declaration capture
//!
//! A single depth-first walk over the syntax tree offers every struct
//! definition, enum definition, typedef declarator and bare type name to a
//! [`SymbolTable`]. Only requested names are stored, and a later capture of
//! the same name replaces an earlier one.

use std::collections::HashMap;
use std::path::Path;

use importsym_core::Result;
use tracing::{debug, info, warn};
use tree_sitter::Node;

use crate::ast::{declarator_name, Declaration, SyntaxNode};
use crate::preprocessor::{CppPreprocessor, PreprocessOptions};
use crate::treesitter::{CParser, SyntaxTree};

/// Requested names and the declaration captured for each
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: HashMap<String, Option<Declaration>>,
}

impl SymbolTable {
    /// Table with one empty slot per distinct requested name
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names.into_iter().map(|n| (n.into(), None)).collect(),
        }
    }

    pub fn is_requested(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Store a declaration under its name if that name was requested.
    ///
    /// Last write wins: a capture replaces whatever the name held before.
    /// Returns whether the declaration was stored.
    pub fn record(&mut self, decl: Declaration) -> bool {
        let Some(slot) = self.entries.get_mut(decl.name()) else {
            return false;
        };

        if let Some(previous) = slot.as_ref() {
            debug!(
                "'{}': {} at {} replaces {} at {}",
                decl.name(),
                decl.kind(),
                decl.location(),
                previous.kind(),
                previous.location()
            );
        } else {
            debug!("'{}': {} at {}", decl.name(), decl.kind(), decl.location());
        }
        *slot = Some(decl);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    /// Number of distinct requested names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of requested names that found a declaration
    pub fn resolved_count(&self) -> usize {
        self.entries.values().filter(|d| d.is_some()).count()
    }
}

/// Walk the whole tree once, recording requested declarations into `table`
pub fn collect_declarations(tree: &SyntaxTree, table: &mut SymbolTable) {
    visit(tree.root(), tree, table);
}

fn visit(node: Node<'_>, tree: &SyntaxTree, table: &mut SymbolTable) {
    // Captured kinds are not descended into.
    match node.kind() {
        "struct_specifier" | "enum_specifier" if node.child_by_field_name("body").is_some() => {
            capture_tagged(node, tree, table);
            return;
        }
        "type_definition" => {
            capture_typedef(node, tree, table);
            return;
        }
        "type_descriptor" => {
            capture_type_name(node, tree, table);
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, tree, table);
    }
}

fn capture_tagged(node: Node<'_>, tree: &SyntaxTree, table: &mut SymbolTable) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = tree.text(name_node);
    if !table.is_requested(name) {
        return;
    }

    let name = name.to_string();
    let location = tree.location_of(node);
    let syntax = SyntaxNode::from_ts(node, tree.source());
    let decl = if node.kind() == "struct_specifier" {
        Declaration::Struct {
            name,
            location,
            node: syntax,
        }
    } else {
        Declaration::Enum {
            name,
            location,
            node: syntax,
        }
    };
    table.record(decl);
}

fn capture_typedef(node: Node<'_>, tree: &SyntaxTree, table: &mut SymbolTable) {
    let mut cursor = node.walk();
    let declarators: Vec<Node<'_>> = node.children_by_field_name("declarator", &mut cursor).collect();

    let wanted: Vec<(Node<'_>, String)> = declarators
        .iter()
        .filter_map(|d| declarator_name(*d, tree.source()).map(|name| (*d, name)))
        .filter(|(_, name)| table.is_requested(name))
        .collect();
    if wanted.is_empty() {
        return;
    }

    let declarator_ids: Vec<usize> = declarators.iter().map(|d| d.id()).collect();
    let mut cursor = node.walk();
    let specifiers: Vec<SyntaxNode> = node
        .children(&mut cursor)
        .filter(|child| !declarator_ids.contains(&child.id()))
        .filter(|child| !matches!(child.kind(), "typedef" | "," | ";" | "comment"))
        .map(|child| SyntaxNode::from_ts(child, tree.source()))
        .collect();

    for (declarator, name) in wanted {
        table.record(Declaration::Typedef {
            name,
            location: tree.location_of(declarator),
            specifiers: specifiers.clone(),
            declarator: SyntaxNode::from_ts(declarator, tree.source()),
        });
    }
}

fn capture_type_name(node: Node<'_>, tree: &SyntaxTree, table: &mut SymbolTable) {
    let Some(name) = declared_type_name(node, tree) else {
        return;
    };
    if !table.is_requested(name) {
        return;
    }

    table.record(Declaration::TypeName {
        name: name.to_string(),
        location: tree.location_of(node),
        node: SyntaxNode::from_ts(node, tree.source()),
    });
}

/// Name a type descriptor declares, following only its declarator chain.
///
/// The type it refers to is not its name. Casts and `sizeof` operands use
/// abstract declarators, so they declare nothing.
fn declared_type_name<'t>(node: Node<'_>, tree: &'t SyntaxTree) -> Option<&'t str> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        match current.kind() {
            "identifier" | "type_identifier" => return Some(tree.text(current)),
            _ => current = current.child_by_field_name("declarator")?,
        }
    }
}

/// Preprocess, parse and filter a compilation unit
pub struct SymbolExtractor {
    preprocessor: CppPreprocessor,
    options: PreprocessOptions,
}

impl SymbolExtractor {
    pub fn new(preprocessor: CppPreprocessor, options: PreprocessOptions) -> Self {
        Self {
            preprocessor,
            options,
        }
    }

    /// Build the symbol table for `names` from the unit at `unit_path`.
    ///
    /// The unit file is removed once it has been parsed; on failure it is
    /// left in place.
    pub fn extract(&self, unit_path: &Path, names: &[String]) -> Result<SymbolTable> {
        let preprocessed = self.preprocessor.preprocess_file(unit_path, &self.options)?;
        for warning in &preprocessed.warnings {
            warn!("{}: {}", self.preprocessor.path().display(), warning);
        }

        let mut parser = CParser::new()?;
        let tree = parser.parse_mapped(
            preprocessed.code,
            &unit_path.display().to_string(),
            preprocessed.line_map,
        )?;

        if let Err(e) = std::fs::remove_file(unit_path) {
            warn!("Could not remove {}: {}", unit_path.display(), e);
        }

        info!("Filtering..");
        let mut table = SymbolTable::new(names.iter().cloned());
        collect_declarations(&tree, &mut table);
        debug!("Resolved {} of {} names", table.resolved_count(), table.len());
        Ok(table)
    }
}
