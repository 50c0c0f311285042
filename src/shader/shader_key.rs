//! Identity keys for shader and program records.
//!
//! - [`ShaderKey`] — one source file compiled for one stage.
//! - [`ProgramKey`] — the canonical member set of a linked program.
//!
//! Both are owned values so they can be used directly as hash-map keys;
//! nothing here depends on where a record happens to live in memory.

use std::fmt;

use smallvec::SmallVec;

use super::shader_id::ShaderId;
use super::stage::ShaderStage;

/// Source path + stage. Ordered by path first, then stage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderKey {
    path: String,
    stage: ShaderStage,
}

impl ShaderKey {
    #[must_use]
    pub fn new(path: impl Into<String>, stage: ShaderStage) -> Self {
        Self {
            path: path.into(),
            stage,
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl fmt::Display for ShaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.stage)
    }
}

/// Sorted, duplicate-free member list of a program.
///
/// Members are ordered by their [`ShaderKey`], so two registrations naming the
/// same shaders in any order (or with repeats) build equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    shaders: SmallVec<[ShaderId; 4]>,
}

impl ProgramKey {
    /// Builds the canonical key for `members`. `key_of` resolves an id to the
    /// shader key it was interned from.
    pub fn canonical<'a, I, F>(members: I, key_of: F) -> Self
    where
        I: IntoIterator<Item = ShaderId>,
        F: Fn(ShaderId) -> &'a ShaderKey,
    {
        let mut shaders: SmallVec<[ShaderId; 4]> = members.into_iter().collect();
        // Ids and keys are interned one-to-one, so equal keys are equal ids and
        // end up adjacent after the sort.
        shaders.sort_by(|a, b| key_of(*a).cmp(key_of(*b)));
        shaders.dedup();
        Self { shaders }
    }

    #[inline]
    #[must_use]
    pub fn shaders(&self) -> &[ShaderId] {
        &self.shaders
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: ShaderId) -> bool {
        self.shaders.contains(&id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}
