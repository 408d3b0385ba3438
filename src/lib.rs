// Export modules for library usage
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod emit;
pub mod errors;
pub mod io;
pub mod select;
pub mod registry;
pub mod template;

// Re-export commonly used types
pub use crate::classify::{error_signal, fallback_name, pfn_typedef_name, ErrorSignal};
pub use crate::commands::generate::{run, GenerateConfig};
pub use crate::config::Indent;
pub use crate::emit::{Emitter, PROBE_COMMAND};
pub use crate::errors::Error;
pub use crate::select::{select, CL_VERSIONS};
pub use crate::registry::{Command, Extension, Feature, NameAndType, Registry, Type};
pub use crate::template::{Notice, Template};
