//! Host environment checks

use importsym_core::config::PreprocessorConfig;
use importsym_core::{Error, Result};
use importsym_parser::preprocessor::CppPreprocessor;
use tracing::debug;

/// Everything a run needs from the host
#[derive(Debug, Clone)]
pub struct Environment {
    pub preprocessor: CppPreprocessor,
}

impl Environment {
    /// Locate the preprocessor and check the fallback libc headers exist
    pub fn probe(config: &PreprocessorConfig) -> Result<Self> {
        let preprocessor = CppPreprocessor::locate(&config.program)?;

        if !config.fake_libc_dir.is_dir() {
            return Err(Error::Environment(format!(
                "couldn't find fake libc headers in '{}'",
                config.fake_libc_dir.display()
            )));
        }

        for dir in config.include_paths().iter().skip(1) {
            if !dir.is_dir() {
                debug!("Include directory {} does not exist", dir.display());
            }
        }

        Ok(Self { preprocessor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_preprocessor() {
        let config = PreprocessorConfig {
            program: "importsym-no-such-preprocessor".into(),
            ..Default::default()
        };

        let err = Environment::probe(&config).unwrap_err();
        assert!(matches!(err, Error::Environment(_)));
    }

    #[test]
    fn test_missing_fake_libc_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = PreprocessorConfig {
            fake_libc_dir: dir.path().join("absent"),
            ..Default::default()
        };

        // Fails on the preprocessor lookup or the header dir, both fatal.
        let err = Environment::probe(&config).unwrap_err();
        assert!(matches!(err, Error::Environment(_)));
    }
}
