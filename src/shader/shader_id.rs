//! Strongly-typed record ids.
//!
//! Thin `Copy` wrappers around a `u32` index into the [`ShaderSet`] record
//! arenas. Records are only ever appended, so an id stays valid for the
//! lifetime of the set that issued it.
//!
//! [`ShaderSet`]: crate::ShaderSet

/// Index of a shader record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderId(pub(crate) u32);

impl ShaderId {
    /// Raw index into the shader record array.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a program record.
///
/// Returned by [`ProgramHandle::id`](crate::ProgramHandle::id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(pub(crate) u32);

impl ProgramId {
    /// Raw index into the program record array.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
