//! C Preprocessor Integration
//!
//! Runs the system `cpp` over the synthesized compilation unit so the
//! parser sees plain C with headers and macros expanded.

pub mod cpp;
pub mod linemap;

pub use cpp::{find_in_path, CppPreprocessor, PreprocessError, PreprocessOptions, PreprocessResult};
pub use linemap::LineMap;
