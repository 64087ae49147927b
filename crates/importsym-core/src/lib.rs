//! importsym Core
//!
//! Core types, configuration and errors shared by the importsym crates.

pub mod config;
pub mod error;
pub mod location;
pub mod types;

pub use config::{Config, MacroDefinition};
pub use error::{Error, Result};
pub use location::Location;
pub use types::*;
