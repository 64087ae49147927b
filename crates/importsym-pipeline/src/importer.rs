//! End-to-end symbol import

use std::path::PathBuf;

use importsym_core::{Config, ImportReport, Result};
use importsym_parser::preprocessor::{CppPreprocessor, PreprocessOptions};
use importsym_parser::SymbolExtractor;
use tracing::{debug, info};

use crate::emitter::DeclarationEmitter;
use crate::environment::Environment;
use crate::loader::RequestLoader;

/// Imports the declarations named in a symbol list into one C file
pub struct SymbolImporter {
    config: Config,
    extractor: SymbolExtractor,
    emitter: DeclarationEmitter,
}

impl SymbolImporter {
    /// Probe the environment and build an importer.
    ///
    /// Fails before touching the symbol list when `cpp` or the fake libc
    /// headers are missing.
    pub fn new(config: Config) -> Result<Self> {
        let env = Environment::probe(&config.preprocessor)?;
        Ok(Self::with_preprocessor(config, env.preprocessor))
    }

    /// Build an importer around an already located preprocessor
    pub fn with_preprocessor(config: Config, preprocessor: CppPreprocessor) -> Self {
        let options = PreprocessOptions::from_config(&config.preprocessor);
        Self {
            extractor: SymbolExtractor::new(preprocessor, options),
            emitter: DeclarationEmitter::new(),
            config,
        }
    }

    /// Run the whole pipeline once.
    ///
    /// The output file is only written after the unit parsed cleanly, so a
    /// failed run leaves any previous output untouched.
    pub fn run(&self) -> Result<ImportReport> {
        let paths = &self.config.paths;

        let loader = RequestLoader::new(&self.config.preprocessor, &paths.unit_file);
        let request = loader.load(&paths.list_file)?;
        let names = request.names();

        let table = self.extractor.extract(loader.unit_path(), &names)?;
        let summary = self.emitter.emit(&table, &names, &paths.output_file)?;
        info!("Done.");

        Ok(ImportReport {
            symbols: request.symbol_count(),
            files: request.file_count(),
            written: summary.written,
            missing: summary.missing,
            output: paths.output_file.clone(),
        })
    }

    /// Remove the configured stale artifacts
    pub fn cleanup(&self) {
        remove_artifacts(&self.config.paths.artifacts);
    }
}

/// Best-effort removal; files that are absent or locked are left alone
pub fn remove_artifacts(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(_) => continue,
        }
    }
}
