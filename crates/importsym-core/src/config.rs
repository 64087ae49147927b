//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// importsym configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File locations used by a run
    pub paths: PathConfig,

    /// Preprocessor invocation settings
    pub preprocessor: PreprocessorConfig,
}

impl Config {
    /// Parse a YAML configuration document; absent keys keep their defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a YAML configuration file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Symbol list to read
    pub list_file: PathBuf,

    /// Declaration file to write
    pub output_file: PathBuf,

    /// Temporary compilation unit handed to the preprocessor
    pub unit_file: PathBuf,

    /// Parser table caches left behind by earlier generator runs,
    /// removed on exit when present
    pub artifacts: Vec<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            list_file: PathBuf::from("symbols.lst"),
            output_file: PathBuf::from("symbols.i"),
            unit_file: PathBuf::from("tmpsrc.h"),
            artifacts: vec!["lextab.py".into(), "yacctab.py".into()],
        }
    }
}

/// Preprocessor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Executable name looked up on `PATH`
    pub program: String,

    /// Root of the project whose headers are imported
    pub project_root: PathBuf,

    /// Header directories, relative to `project_root`
    pub include_dirs: Vec<PathBuf>,

    /// Minimal libc headers the parser can digest, searched before anything else
    pub fake_libc_dir: PathBuf,

    /// Compatibility macros written at the top of the compilation unit.
    /// Fixed per build; never read from a configuration file.
    #[serde(skip, default = "compat_prelude")]
    pub prelude: Vec<MacroDefinition>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            program: "cpp".to_string(),
            project_root: PathBuf::from("../../../"),
            include_dirs: vec![
                "pjlib/include".into(),
                "pjlib-util/include".into(),
                "pjnath/include".into(),
                "pjmedia/include".into(),
                "pjsip/include".into(),
            ],
            fake_libc_dir: PathBuf::from("fake_libc_include"),
            prelude: compat_prelude(),
        }
    }
}

impl PreprocessorConfig {
    /// Include search paths in the order they are passed to the preprocessor
    pub fn include_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(self.include_dirs.len() + 1);
        paths.push(self.fake_libc_dir.clone());
        paths.extend(self.include_dirs.iter().map(|d| self.project_root.join(d)));
        paths
    }

    /// Prelude rendered as `#define` lines
    pub fn prelude_text(&self) -> String {
        let mut text = String::new();
        for macro_def in &self.prelude {
            text.push_str(&macro_def.to_define_line());
            text.push('\n');
        }
        text
    }
}

/// Stand-ins for constructs the C grammar cannot handle in real platform headers
pub fn compat_prelude() -> Vec<MacroDefinition> {
    vec![
        MacroDefinition::with_value("PJ_AUTOCONF", "1"),
        MacroDefinition::with_value("jmp_buf", "int"),
        MacroDefinition::function_like("__attribute__", &["x"], ""),
    ]
}

/// A macro definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    /// Parameter names for function-like macros
    pub params: Option<Vec<String>>,
    /// Replacement text, possibly empty
    pub value: String,
}

impl MacroDefinition {
    /// Create a macro with a specific value
    pub fn with_value(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            params: None,
            value: value.to_string(),
        }
    }

    /// Create a function-like macro
    pub fn function_like(name: &str, params: &[&str], body: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Some(params.iter().map(|p| p.to_string()).collect()),
            value: body.to_string(),
        }
    }

    /// Render as a `#define` line
    pub fn to_define_line(&self) -> String {
        let signature = match &self.params {
            Some(params) => format!("{}({})", self.name, params.join(",")),
            None => self.name.clone(),
        };
        if self.value.is_empty() {
            format!("#define {}", signature)
        } else {
            format!("#define {} {}", signature, self.value)
        }
    }
}
