//! importsym Pipeline
//!
//! Load → Synthesize → Parse → Capture → Emit.
//!
//! [`SymbolImporter`] wires the stages together; each stage is usable on its
//! own for testing.

pub mod emitter;
pub mod environment;
pub mod importer;
pub mod loader;

pub use emitter::{DeclarationEmitter, EmitSummary, GENERATED_HEADER};
pub use environment::Environment;
pub use importer::{remove_artifacts, SymbolImporter};
pub use loader::{CompilationUnit, RequestLoader};
