//! Shader Set Settings
//!
//! Source text shared by every shader the set compiles.
//!
//! ```rust,ignore
//! use shaderset::{ShaderSet, ShaderSetSettings};
//!
//! let settings = ShaderSetSettings {
//!     version: "450 core".into(),
//!     preamble: "#define POSITION_LOCATION 0\n".into(),
//! };
//! let shaders = ShaderSet::new(backend).with_settings(settings);
//! ```

use serde::{Deserialize, Serialize};

/// Version used when none is configured.
pub const DEFAULT_GLSL_VERSION: &str = "330";

/// Configuration prepended to every compiled shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSetSettings {
    /// Emitted as `#version {version}`. Kept apart from the preamble because
    /// `#version` must be the first directive of the source.
    pub version: String,

    /// Text placed after the stage define and before the file contents, e.g.
    /// shared `#define`s for attribute locations. Not reloaded on change.
    pub preamble: String,
}

impl Default for ShaderSetSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_GLSL_VERSION.to_owned(),
            preamble: String::new(),
        }
    }
}
