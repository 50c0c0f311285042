//! # shaderset
//!
//! A deduplicating cache of shader objects and linked programs that reloads
//! shader sources from disk while the application runs.
//!
//! Programs are registered once as sets of `(file, stage)` pairs. Each call to
//! [`ShaderSet::update`] polls the files, recompiles the ones that changed and
//! relinks the programs that use them. Callers keep a [`ProgramHandle`] whose
//! value always reflects the latest successful link, and which reads as
//! invalid while a program has never linked or its last link failed.
//!
//! ```rust,ignore
//! use shaderset::{ShaderSet, ShaderStage};
//!
//! let mut shaders = ShaderSet::new(my_gl_backend);
//! shaders.set_version("450 core");
//! shaders.set_preamble_file("shaders/preamble.glsl")?;
//!
//! let quad = shaders.add_program_from_exts(&["shaders/quad.vert", "shaders/quad.frag"])?;
//! let sky = shaders.add_program_from_combined_file(
//!     "shaders/sky.glsl",
//!     &[ShaderStage::Vertex, ShaderStage::Fragment],
//! )?;
//!
//! loop {
//!     for diagnostic in shaders.update().errors() {
//!         eprintln!("{diagnostic}");
//!     }
//!     if let Some(program) = quad.get() {
//!         // bind `program.raw()` and draw
//!     }
//! }
//! ```
//!
//! The GPU API is reached only through [`ShaderBackend`], and shader files
//! only through [`SourceProvider`].

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod backend;
pub mod cache;
pub mod diagnostics;
pub mod errors;
pub mod handle;
pub mod io;
pub mod settings;
pub mod shader;

pub use backend::{ProgramObject, ShaderBackend, ShaderObject};
pub use cache::{LinkState, ShaderSet};
pub use diagnostics::{Diagnostic, DiagnosticKind, UpdateReport};
pub use errors::{Result, ShaderSetError};
pub use handle::{INVALID_PROGRAM, ProgramHandle};
pub use io::{FsSourceProvider, SourceProvider};
pub use settings::ShaderSetSettings;
pub use shader::{ProgramId, ProgramKey, ShaderId, ShaderKey, ShaderStage};
