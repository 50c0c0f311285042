//! Live Program Handles
//!
//! A [`ProgramHandle`] is what callers keep after registering a program. It
//! shares one cell with the cache's program record, so every relink the cache
//! performs is visible through every clone of the handle without the caller
//! registering again.
//!
//! The cell holds the program object name while the most recent link
//! succeeded and [`INVALID_PROGRAM`] otherwise:
//!
//! ```rust,ignore
//! let quad = shaders.add_program_from_exts(&["quad.vert", "quad.frag"])?;
//! loop {
//!     shaders.update();
//!     if let Some(program) = quad.get() {
//!         gl.use_program(program.raw());
//!         // draw
//!     }
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::backend::ProgramObject;
use crate::shader::ProgramId;

/// Value of the public cell while the program is not usable.
pub const INVALID_PROGRAM: u32 = 0;

/// Shared, cloneable view of a program's public handle.
#[derive(Debug, Clone)]
pub struct ProgramHandle {
    id: ProgramId,
    public: Arc<AtomicU32>,
}

impl ProgramHandle {
    pub(crate) fn new(id: ProgramId, public: Arc<AtomicU32>) -> Self {
        Self { id, public }
    }

    /// The program record this handle views. Equal ids mean the same program.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// The program to render with, or `None` if it has not linked
    /// successfully (yet, or since its last failed link).
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<ProgramObject> {
        ProgramObject::new(self.raw())
    }

    /// Raw object name; [`INVALID_PROGRAM`] when unusable.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.public.load(Ordering::Acquire)
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.raw() != INVALID_PROGRAM
    }

    /// `true` if both handles view the same program record.
    #[inline]
    #[must_use]
    pub fn same_program(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.public, &other.public)
    }
}

impl PartialEq for ProgramHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_program(other)
    }
}

impl Eq for ProgramHandle {}

/// Writer side of the public cell, kept in the program record.
#[derive(Debug, Default)]
pub(crate) struct PublicSlot(Arc<AtomicU32>);

impl PublicSlot {
    pub(crate) fn handle(&self, id: ProgramId) -> ProgramHandle {
        ProgramHandle::new(id, Arc::clone(&self.0))
    }

    pub(crate) fn publish(&self, program: ProgramObject) {
        self.0.store(program.raw(), Ordering::Release);
    }

    pub(crate) fn invalidate(&self) {
        self.0.store(INVALID_PROGRAM, Ordering::Release);
    }

    pub(crate) fn raw(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}
