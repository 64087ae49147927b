//! importsym Parser
//!
//! Parses the preprocessed compilation unit with tree-sitter and turns the
//! requested declarations back into C text.
//!
//! ## Modules
//!
//! - `preprocessor` - `cpp` lookup and invocation
//! - `treesitter` - C grammar parsing into a syntax tree
//! - `ast` - owned declaration nodes captured from the tree
//! - `extract` - name-keyed declaration capture
//! - `codegen` - canonical C regeneration

pub mod ast;
pub mod codegen;
pub mod extract;
pub mod preprocessor;
pub mod treesitter;

pub use ast::{Declaration, SyntaxNode};
pub use codegen::CGenerator;
pub use extract::{collect_declarations, SymbolExtractor, SymbolTable};
pub use treesitter::{CParser, SyntaxTree};
