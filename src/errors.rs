//! Error Types
//!
//! Errors returned by the [`ShaderSet`](crate::ShaderSet) configuration and
//! registration calls.
//!
//! Compile and link failures are **not** errors in this sense: they are the
//! normal live-reload workflow and are reported as
//! [`Diagnostic`](crate::Diagnostic)s from [`ShaderSet::update`](crate::ShaderSet::update).
//!
//! ```rust,ignore
//! use shaderset::errors::{Result, ShaderSetError};
//!
//! match shaders.add_program_from_exts(&["quad.vert", "quad.txt"]) {
//!     Err(ShaderSetError::UnknownExtension { path }) => eprintln!("bad file: {path}"),
//!     _ => {}
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for shader set configuration and registration.
#[derive(Error, Debug)]
pub enum ShaderSetError {
    // ========================================================================
    // Registration Errors
    // ========================================================================
    /// A file name had no extension, or one that maps to no shader stage.
    #[error("Unknown shader file extension: {path}")]
    UnknownExtension {
        /// The offending file name, as passed by the caller.
        path: String,
    },

    /// A program was registered with no shaders at all.
    #[error("A program needs at least one shader")]
    EmptyProgram,

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// Reading a configuration file (e.g. the preamble) failed.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Alias for `Result<T, ShaderSetError>`.
pub type Result<T> = std::result::Result<T, ShaderSetError>;
