//! Pipeline stages and their naming conventions.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The pipeline role of a shader.
///
/// The declaration order is the canonical sort order used inside
/// [`ShaderKey`](super::ShaderKey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 6] = [
        Self::Vertex,
        Self::Fragment,
        Self::Geometry,
        Self::TessControl,
        Self::TessEvaluation,
        Self::Compute,
    ];

    /// Preprocessor symbol defined in front of every source compiled for this
    /// stage. Combined multi-stage files branch on it with `#ifdef`.
    #[inline]
    #[must_use]
    pub const fn define(self) -> &'static str {
        match self {
            Self::Vertex => "VERTEX_SHADER",
            Self::Fragment => "FRAGMENT_SHADER",
            Self::Geometry => "GEOMETRY_SHADER",
            Self::TessControl => "TESS_CONTROL_SHADER",
            Self::TessEvaluation => "TESS_EVALUATION_SHADER",
            Self::Compute => "COMPUTE_SHADER",
        }
    }

    /// Conventional file extension (without the dot).
    #[inline]
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
            Self::Geometry => "geom",
            Self::TessControl => "tesc",
            Self::TessEvaluation => "tese",
            Self::Compute => "comp",
        }
    }

    /// Maps a bare extension to a stage. Matching is exact (`"vert"`, not `".vert"`).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.extension() == ext)
    }

    /// Infers the stage from the extension of `path`.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Geometry => "geometry",
            Self::TessControl => "tessellation control",
            Self::TessEvaluation => "tessellation evaluation",
            Self::Compute => "compute",
        };
        f.write_str(name)
    }
}
