//! Structured reports produced by [`ShaderSet::update`](crate::ShaderSet::update).
//!
//! Nothing here is printed by the crate itself beyond `log` records; the host
//! decides whether a [`Diagnostic`] goes to a console, an overlay, or an
//! assertion in a test.

use std::fmt;

use crate::shader::{ProgramId, ShaderKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A shader file could not be stat'ed or read.
    Io,
    /// A shader failed to compile. The message is the compiler log with file
    /// fingerprints replaced by file names.
    CompileFailed,
    /// A program linked successfully. The message is the (often empty) link log.
    Linked,
    /// A program failed to link; its public handle is now invalid.
    LinkFailed,
}

impl DiagnosticKind {
    #[inline]
    #[must_use]
    pub fn is_error(self) -> bool {
        !matches!(self, Self::Linked)
    }
}

/// One event from an update cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// File path for shader events, or the member paths joined with `", "`
    /// in canonical order for program events.
    pub subject: String,
    /// Set for program events.
    pub program: Option<ProgramId>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::Io => write!(f, "Error accessing {}: {}", self.subject, self.message),
            DiagnosticKind::CompileFailed => {
                write!(f, "Error compiling {}:\n{}", self.subject, self.message)
            }
            DiagnosticKind::Linked | DiagnosticKind::LinkFailed => {
                let verb = if self.kind == DiagnosticKind::Linked {
                    "Successfully linked"
                } else {
                    "Error linking"
                };
                write!(f, "{verb} program ({})", self.subject)?;
                if self.message.is_empty() {
                    Ok(())
                } else {
                    write!(f, ":\n{}", self.message)
                }
            }
        }
    }
}

/// Outcome of one [`ShaderSet::update`](crate::ShaderSet::update) call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Shaders whose timestamp advanced and were recompiled, in canonical order.
    pub recompiled: Vec<ShaderKey>,
    /// Programs a link was attempted for, successful or not.
    pub relinked: Vec<ProgramId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UpdateReport {
    /// `true` when nothing was recompiled or relinked and nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recompiled.is_empty() && self.relinked.is_empty() && self.diagnostics.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind.is_error())
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}
