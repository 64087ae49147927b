//! Core type definitions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// Whether `name` is a valid C identifier
pub fn is_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}

/// One line of a symbol list: a header and the names wanted from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRequest {
    /// Header path as written in an `#include <...>` directive
    pub header: String,
    /// Requested identifiers, in listed order
    pub names: Vec<String>,
    /// Line in the list file (1-based)
    pub line: usize,
}

/// Parsed symbol list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRequest {
    pub entries: Vec<HeaderRequest>,
}

impl SymbolRequest {
    /// Parse symbol list text.
    ///
    /// Each line reads `<header> <name> [<name> ...]`. Lines with fewer than
    /// two tokens and lines starting with `#` are skipped. Names are taken
    /// as written; see [`SymbolRequest::malformed_names`].
    pub fn parse(content: &str) -> Self {
        let mut entries = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let mut tokens = line.split_whitespace();
            let Some(header) = tokens.next() else {
                continue;
            };
            if header.starts_with('#') {
                continue;
            }

            let names: Vec<String> = tokens.map(str::to_string).collect();
            if names.is_empty() {
                continue;
            }

            entries.push(HeaderRequest {
                header: header.to_string(),
                names,
                line: idx + 1,
            });
        }

        Self { entries }
    }

    /// Requested names that cannot match any declaration, with their list line
    pub fn malformed_names(&self) -> Vec<(usize, &str)> {
        self.entries
            .iter()
            .flat_map(|e| e.names.iter().map(move |n| (e.line, n.as_str())))
            .filter(|(_, name)| !is_identifier(name))
            .collect()
    }

    /// Headers in list order, one per processed line
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.header.as_str())
    }

    /// All requested names flattened in list order, duplicates kept
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.names.iter().cloned())
            .collect()
    }

    /// Number of requested names, counting duplicates
    pub fn symbol_count(&self) -> usize {
        self.entries.iter().map(|e| e.names.len()).sum()
    }

    /// Number of processed lines
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Kinds of declaration the extractor captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Struct,
    Enum,
    Typedef,
    TypeName,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Typedef => "typedef",
            DeclKind::TypeName => "type name",
        };
        f.write_str(s)
    }
}

/// Summary of one import run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Requested names, counting duplicates
    pub symbols: usize,
    /// Processed list lines
    pub files: usize,
    /// Names written to the output, in output order
    pub written: Vec<String>,
    /// Names with no matching declaration
    pub missing: Vec<String>,
    /// Declaration file that was written
    pub output: PathBuf,
}
