//! Declaration file emission

use std::path::Path;

use importsym_core::Result;
use importsym_parser::{CGenerator, SymbolTable};
use tracing::{info, warn};

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// This file is autogenerated by importsym script, do not modify!\n\n";

/// Names written and skipped by one emission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub written: Vec<String>,
    pub missing: Vec<String>,
}

/// Writes captured declarations in request order
#[derive(Debug, Default)]
pub struct DeclarationEmitter {
    generator: CGenerator,
}

impl DeclarationEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the whole output file.
    ///
    /// Names are visited in the order given; a name listed twice is written
    /// twice. Names without a declaration are reported and left out.
    pub fn render(&self, table: &SymbolTable, names: &[String]) -> (String, EmitSummary) {
        let mut out = String::from(GENERATED_HEADER);
        let mut summary = EmitSummary::default();

        for name in names {
            match table.get(name) {
                Some(decl) => {
                    info!("  writing '{}'..", name);
                    out.push_str(&self.generator.generate(decl));
                    out.push_str(";\n\n");
                    summary.written.push(name.clone());
                }
                None => {
                    warn!("  declaration for '{}' is not found", name);
                    summary.missing.push(name.clone());
                }
            }
        }

        (out, summary)
    }

    /// Render and write to `output`, replacing any previous content
    pub fn emit(&self, table: &SymbolTable, names: &[String], output: &Path) -> Result<EmitSummary> {
        info!("Writing declarations..");
        let (text, summary) = self.render(table, names);
        std::fs::write(output, text)?;
        Ok(summary)
    }
}
