//! Request loading and compilation unit synthesis

use std::path::{Path, PathBuf};

use importsym_core::config::PreprocessorConfig;
use importsym_core::{Error, Result, SymbolRequest};
use tracing::{debug, info, warn};

/// C text that pulls every requested header into one translation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    text: String,
}

impl CompilationUnit {
    /// Prelude followed by one `#include` per list line, duplicates included
    pub fn synthesize(prelude: &str, request: &SymbolRequest) -> Self {
        let mut text = String::from(prelude);
        for header in request.headers() {
            text.push_str(&format!("#include <{}>\n", header));
        }
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.text)?;
        Ok(())
    }
}

/// Reads a symbol list and writes the matching compilation unit
pub struct RequestLoader {
    prelude: String,
    unit_path: PathBuf,
}

impl RequestLoader {
    pub fn new(config: &PreprocessorConfig, unit_path: impl Into<PathBuf>) -> Self {
        Self {
            prelude: config.prelude_text(),
            unit_path: unit_path.into(),
        }
    }

    pub fn unit_path(&self) -> &Path {
        &self.unit_path
    }

    /// Parse the list at `list_path` and write the compilation unit
    pub fn load(&self, list_path: &Path) -> Result<SymbolRequest> {
        let content = std::fs::read_to_string(list_path)
            .map_err(|e| Error::Request(format!("cannot read {}: {}", list_path.display(), e)))?;
        let request = SymbolRequest::parse(&content);
        for (line, name) in request.malformed_names() {
            warn!("{}:{}: '{}' is not a C identifier", list_path.display(), line, name);
        }

        let unit = CompilationUnit::synthesize(&self.prelude, &request);
        unit.write_to(&self.unit_path)?;
        debug!("Wrote compilation unit to {}", self.unit_path.display());

        info!(
            "Parsing {} symbols from {} files..",
            request.symbol_count(),
            request.file_count()
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_synthesize_unit() {
        let request = SymbolRequest::parse("pj/types.h pj_status_t\npj/sock.h pj_sockaddr\npj/types.h pj_bool_t\n");
        let unit = CompilationUnit::synthesize(&PreprocessorConfig::default().prelude_text(), &request);

        assert_eq!(
            unit.text(),
            "#define PJ_AUTOCONF 1\n\
             #define jmp_buf int\n\
             #define __attribute__(x)\n\
             #include <pj/types.h>\n\
             #include <pj/sock.h>\n\
             #include <pj/types.h>\n"
        );
    }

    #[test]
    fn test_empty_request_unit_is_prelude() {
        let request = SymbolRequest::parse("\n");
        let unit = CompilationUnit::synthesize("#define A 1\n", &request);
        assert_eq!(unit.text(), "#define A 1\n");
    }

    #[test]
    fn test_load_writes_unit() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("symbols.lst");
        let unit_path = dir.path().join("tmpsrc.h");
        std::fs::write(&list, "a.h X Y\n\nb.h Z\n").unwrap();

        let loader = RequestLoader::new(&PreprocessorConfig::default(), &unit_path);
        let request = loader.load(&list).unwrap();

        assert_eq!(request.names(), vec!["X", "Y", "Z"]);
        let written = std::fs::read_to_string(&unit_path).unwrap();
        assert!(written.ends_with("#include <a.h>\n#include <b.h>\n"));
    }

    #[test]
    fn test_malformed_name_does_not_abort_load() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("symbols.lst");
        let unit_path = dir.path().join("tmpsrc.h");
        std::fs::write(&list, "pj/types.h pj_status_t pj_str_t,\n").unwrap();

        let loader = RequestLoader::new(&PreprocessorConfig::default(), &unit_path);
        let request = loader.load(&list).unwrap();

        assert_eq!(request.names(), vec!["pj_status_t", "pj_str_t,"]);
        assert!(unit_path.exists());
    }

    #[test]
    fn test_missing_list_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = RequestLoader::new(&PreprocessorConfig::default(), dir.path().join("tmpsrc.h"));

        let err = loader.load(&dir.path().join("absent.lst")).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
        assert!(!dir.path().join("tmpsrc.h").exists());
    }
}
