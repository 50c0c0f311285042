//! Shader identity and source generation
//!
//! - `stage`: pipeline stages, their defines and file extensions
//! - `shader_id`: arena indices for shader / program records
//! - `shader_key`: hashable identity keys, including the canonical program key
//! - `source_gen`: `#version` / `#define` / `#line` assembly and log name recovery

pub mod shader_id;
pub mod shader_key;
pub mod source_gen;
pub mod stage;

pub use shader_id::{ProgramId, ShaderId};
pub use shader_key::{ProgramKey, ShaderKey};
pub use source_gen::{PREAMBLE_NAME, ShaderSource, fingerprint, preamble_fingerprint};
pub use stage::ShaderStage;
