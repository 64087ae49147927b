//! C Preprocessor Integration
//!
//! Wraps the system `cpp` executable. The compilation unit is preprocessed
//! with a fixed set of include paths before it reaches the parser. Line
//! markers are kept so positions can be traced back to the headers.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

use importsym_core::config::PreprocessorConfig;

use super::linemap::LineMap;

/// Errors that can occur during preprocessing
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("need to have {0} in PATH")]
    NotFound(String),

    #[error("Preprocessing failed: {0}")]
    PreprocessFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid source file: {0}")]
    InvalidSource(String),
}

impl From<PreprocessError> for importsym_core::Error {
    fn from(err: PreprocessError) -> Self {
        match err {
            PreprocessError::NotFound(_) => importsym_core::Error::Environment(err.to_string()),
            other => importsym_core::Error::Preprocess(other.to_string()),
        }
    }
}

/// Options for preprocessing
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    /// Include paths (-I flags), searched in order
    pub includes: Vec<PathBuf>,
}

impl PreprocessOptions {
    /// Options for a symbol import run
    pub fn from_config(config: &PreprocessorConfig) -> Self {
        Self {
            includes: config.include_paths(),
        }
    }
}

/// Result of preprocessing
#[derive(Debug)]
pub struct PreprocessResult {
    /// Preprocessed source code, line markers blanked
    pub code: String,
    /// Header line of each row of `code`
    pub line_map: LineMap,
    /// Warnings reported on stderr
    pub warnings: Vec<String>,
}

/// `cpp` wrapper
#[derive(Debug, Clone)]
pub struct CppPreprocessor {
    cpp_path: PathBuf,
}

impl CppPreprocessor {
    /// Locate `program` on `PATH`
    pub fn locate(program: &str) -> Result<Self, PreprocessError> {
        let path_var = std::env::var_os("PATH").unwrap_or_default();
        let cpp_path = find_in_path(program, &path_var)
            .ok_or_else(|| PreprocessError::NotFound(program.to_string()))?;
        debug!("Found {} at: {:?}", program, cpp_path);
        Ok(Self { cpp_path })
    }

    /// Create a preprocessor with a specific executable path
    pub fn with_path(cpp_path: PathBuf) -> Self {
        Self { cpp_path }
    }

    pub fn path(&self) -> &Path {
        &self.cpp_path
    }

    /// Preprocess a source file
    pub fn preprocess_file(
        &self,
        source_path: &Path,
        options: &PreprocessOptions,
    ) -> Result<PreprocessResult, PreprocessError> {
        if !source_path.is_file() {
            return Err(PreprocessError::InvalidSource(format!(
                "File not found: {:?}",
                source_path
            )));
        }

        let args = self.build_args(options);
        debug!("Preprocessing {:?} with args: {:?}", source_path, args);

        let output = Command::new(&self.cpp_path)
            .args(&args)
            .arg(source_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PreprocessError::PreprocessFailed(stderr.trim().to_string()));
        }

        let (code, line_map) = LineMap::strip(&String::from_utf8_lossy(&output.stdout));
        Ok(PreprocessResult {
            code,
            line_map,
            warnings: self.parse_warnings(&output.stderr),
        })
    }

    /// Build command line arguments
    fn build_args(&self, options: &PreprocessOptions) -> Vec<String> {
        options
            .includes
            .iter()
            .map(|include| format!("-I{}", include.display()))
            .collect()
    }

    /// Parse warnings from stderr
    fn parse_warnings(&self, stderr: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(stderr)
            .lines()
            .filter(|line| line.contains("warning:"))
            .map(str::to_string)
            .collect()
    }
}

/// Search a `PATH`-style variable for an executable
pub fn find_in_path(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    let program = executable_name(program);

    let as_path = Path::new(&program);
    if as_path.components().count() > 1 {
        return is_executable(as_path).then(|| as_path.to_path_buf());
    }

    std::env::split_paths(path_var)
        .map(|dir| {
            let dir = dir.to_string_lossy().trim_matches('"').to_string();
            PathBuf::from(dir).join(&program)
        })
        .find(|candidate| is_executable(candidate))
}

fn executable_name(program: &str) -> String {
    if cfg!(windows) && !program.ends_with(".exe") {
        format!("{}.exe", program)
    } else {
        program.to_string()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
