//! Shader Set
//!
//! Central owner of every shader object and program object. Records live in
//! contiguous `Vec`s addressed by [`ShaderId`] / [`ProgramId`]; identity keys
//! map to those ids through `FxHashMap`s.
//!
//! # Identity
//!
//! - A shader is identified by its [`ShaderKey`] (path + stage). Two programs
//!   naming the same file for the same stage share one shader object.
//! - A program is identified by its [`ProgramKey`], the sorted, deduplicated
//!   member set. Registering `[a, b]` and `[b, a, a]` yields the same program.
//!
//! # Update Cycle
//!
//! [`ShaderSet::update`] runs three phases, each over a complete view of the
//! previous one:
//!
//! 1. **Poll** — stat every shader file; those whose timestamp advanced form
//!    the changed set.
//! 2. **Recompile** — rebuild each changed shader in place on its existing
//!    object.
//! 3. **Relink** — every program with a changed member is relinked, but only
//!    if all of its members currently compile. Success publishes the program
//!    through its [`ProgramHandle`]; a link failure invalidates the handle; a
//!    skipped link leaves it untouched.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::backend::{ProgramObject, ShaderBackend, ShaderObject};
use crate::diagnostics::{Diagnostic, DiagnosticKind, UpdateReport};
use crate::errors::{Result, ShaderSetError};
use crate::handle::{ProgramHandle, PublicSlot};
use crate::io::{FsSourceProvider, SourceProvider};
use crate::settings::ShaderSetSettings;
use crate::shader::source_gen::restore_file_names;
use crate::shader::{
    ProgramId, ProgramKey, ShaderId, ShaderKey, ShaderSource, ShaderStage, fingerprint,
};

/// Link state of a program record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// No link has been attempted yet.
    Unlinked,
    /// The most recent link succeeded.
    Linked,
    /// The most recent link failed.
    LinkFailed,
}

struct ShaderRecord {
    key: ShaderKey,
    object: ShaderObject,
    /// Last timestamp a compile was started for; 0 until the first poll.
    timestamp: u64,
    fingerprint: u32,
    /// Whether the last poll failed, so repeated failures are reported once.
    stat_failed: bool,
}

struct ProgramRecord {
    key: ProgramKey,
    object: ProgramObject,
    public: PublicSlot,
    state: LinkState,
}

/// Deduplicating cache of shaders and programs with live reload.
pub struct ShaderSet<B: ShaderBackend, S: SourceProvider = FsSourceProvider> {
    backend: B,
    sources: S,
    settings: ShaderSetSettings,

    // ---- Storage (contiguous, indexed by Id) ----
    shaders: Vec<ShaderRecord>,
    programs: Vec<ProgramRecord>,

    // ---- Identity lookups ----
    shader_lookup: FxHashMap<ShaderKey, ShaderId>,
    program_lookup: FxHashMap<ProgramKey, ProgramId>,
}

impl<B: ShaderBackend> ShaderSet<B, FsSourceProvider> {
    /// Creates a set that reads shader files relative to the working directory.
    pub fn new(backend: B) -> Self {
        Self::with_provider(backend, FsSourceProvider::default())
    }
}

impl<B: ShaderBackend, S: SourceProvider> ShaderSet<B, S> {
    pub fn with_provider(backend: B, sources: S) -> Self {
        Self {
            backend,
            sources,
            settings: ShaderSetSettings::default(),
            shaders: Vec::new(),
            programs: Vec::new(),
            shader_lookup: FxHashMap::default(),
            program_lookup: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ShaderSetSettings) -> Self {
        self.settings = settings;
        self
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// Sets the `#version` emitted at the top of every shader.
    ///
    /// Takes effect on the next compile of each shader; see [`Self::reload_all`].
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.settings.version = version.into();
    }

    /// Sets the text prepended to every shader.
    ///
    /// Takes effect on the next compile of each shader; see [`Self::reload_all`].
    pub fn set_preamble(&mut self, preamble: impl Into<String>) {
        self.settings.preamble = preamble.into();
    }

    /// Reads the preamble from `path` once. The file is not watched.
    ///
    /// On failure the current preamble is kept.
    pub fn set_preamble_file(&mut self, path: &str) -> Result<()> {
        let preamble = self
            .sources
            .read_to_string(path)
            .map_err(|source| ShaderSetError::Io {
                path: path.into(),
                source,
            })?;
        self.set_preamble(preamble);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ShaderSetSettings {
        &self.settings
    }

    // ── Registration ─────────────────────────────────────────────────────────

    /// Registers a program made of `(path, stage)` shaders, or finds the one
    /// already registered for the same set.
    ///
    /// Nothing is compiled here; the next [`Self::update`] compiles the new
    /// shaders and links the program.
    ///
    /// ```rust,ignore
    /// let quad = shaders.add_program(&[
    ///     ("quad.vert", ShaderStage::Vertex),
    ///     ("quad.frag", ShaderStage::Fragment),
    /// ])?;
    /// ```
    pub fn add_program<P: AsRef<str>>(
        &mut self,
        shaders: &[(P, ShaderStage)],
    ) -> Result<ProgramHandle> {
        if shaders.is_empty() {
            return Err(ShaderSetError::EmptyProgram);
        }

        let members: SmallVec<[ShaderId; 4]> = shaders
            .iter()
            .map(|(path, stage)| self.get_or_create_shader(path.as_ref(), *stage))
            .collect();

        let key = ProgramKey::canonical(members, |id| &self.shaders[id.index()].key);
        let id = self.get_or_create_program(key);

        Ok(self.programs[id.index()].public.handle(id))
    }

    /// Registers a program, inferring each stage from the file extension
    /// (`vert`, `frag`, `geom`, `tesc`, `tese`, `comp`).
    ///
    /// If any path has an unknown extension nothing is registered.
    pub fn add_program_from_exts<P: AsRef<str>>(&mut self, paths: &[P]) -> Result<ProgramHandle> {
        let typed = paths
            .iter()
            .map(|path| {
                let path: &str = path.as_ref();
                ShaderStage::from_path(path)
                    .map(|stage| (path, stage))
                    .ok_or_else(|| ShaderSetError::UnknownExtension {
                        path: path.to_owned(),
                    })
            })
            .collect::<Result<SmallVec<[(&str, ShaderStage); 4]>>>()?;

        self.add_program(&typed)
    }

    /// Registers a program whose stages all come from one file. Each stage is
    /// compiled separately with its stage define (`VERTEX_SHADER`, ...) set, so
    /// the file selects its code with `#ifdef`.
    pub fn add_program_from_combined_file(
        &mut self,
        path: &str,
        stages: &[ShaderStage],
    ) -> Result<ProgramHandle> {
        let typed: SmallVec<[(&str, ShaderStage); 4]> =
            stages.iter().map(|&stage| (path, stage)).collect();
        self.add_program(&typed)
    }

    fn get_or_create_shader(&mut self, path: &str, stage: ShaderStage) -> ShaderId {
        let key = ShaderKey::new(path, stage);
        if let Some(&id) = self.shader_lookup.get(&key) {
            return id;
        }

        let id = ShaderId(self.shaders.len() as u32);
        let object = self.backend.create_shader(stage);
        log::debug!("Created {stage} shader {} for {path}", object.raw());

        self.shaders.push(ShaderRecord {
            fingerprint: fingerprint(path),
            key: key.clone(),
            object,
            timestamp: 0,
            stat_failed: false,
        });
        self.shader_lookup.insert(key, id);
        id
    }

    fn get_or_create_program(&mut self, key: ProgramKey) -> ProgramId {
        if let Some(&id) = self.program_lookup.get(&key) {
            return id;
        }

        let id = ProgramId(self.programs.len() as u32);
        let object = self.backend.create_program();
        for shader in key.shaders() {
            self.backend
                .attach_shader(object, self.shaders[shader.index()].object);
        }

        self.programs.push(ProgramRecord {
            key: key.clone(),
            object,
            public: PublicSlot::default(),
            state: LinkState::Unlinked,
        });
        self.program_lookup.insert(key, id);
        id
    }

    // ── Update Cycle ─────────────────────────────────────────────────────────

    /// Polls all shader files, recompiles the changed ones and relinks the
    /// programs that depend on them.
    ///
    /// Must be called on the thread that owns the graphics context.
    pub fn update(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();

        let changed = self.poll_changes(&mut report);
        if changed.is_empty() {
            return report;
        }

        for &id in &changed {
            self.recompile(id, &mut report);
        }

        let changed: FxHashSet<ShaderId> = changed.into_iter().collect();
        self.relink_affected(&changed, &mut report);

        report
    }

    /// Makes the next [`Self::update`] recompile every shader whose file can
    /// be stat'ed, e.g. after changing the version or preamble.
    pub fn reload_all(&mut self) {
        for shader in &mut self.shaders {
            shader.timestamp = 0;
        }
    }

    /// Returns the changed shaders in canonical key order, with their stored
    /// timestamps already advanced.
    fn poll_changes(&mut self, report: &mut UpdateReport) -> Vec<ShaderId> {
        let mut changed = Vec::new();

        for (index, shader) in self.shaders.iter_mut().enumerate() {
            let timestamp = match self.sources.modified(shader.key.path()) {
                Ok(timestamp) => {
                    shader.stat_failed = false;
                    timestamp
                }
                Err(err) => {
                    if !shader.stat_failed {
                        shader.stat_failed = true;
                        log::warn!("Cannot stat shader {}: {err}", shader.key.path());
                        report.diagnostics.push(Diagnostic {
                            kind: DiagnosticKind::Io,
                            subject: shader.key.path().to_owned(),
                            program: None,
                            message: err.to_string(),
                        });
                    }
                    0
                }
            };

            if timestamp > shader.timestamp {
                shader.timestamp = timestamp;
                changed.push(ShaderId(index as u32));
            }
        }

        changed.sort_by(|a, b| self.shaders[a.index()].key.cmp(&self.shaders[b.index()].key));
        changed
    }

    fn recompile(&mut self, id: ShaderId, report: &mut UpdateReport) {
        let shader = &self.shaders[id.index()];
        let path = shader.key.path();

        let contents = self.sources.read_to_string(path).unwrap_or_else(|err| {
            log::warn!("Cannot read shader {path}: {err}");
            report.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::Io,
                subject: path.to_owned(),
                program: None,
                message: err.to_string(),
            });
            String::new()
        });

        let source = ShaderSource::assemble(
            &self.settings.version,
            shader.key.stage(),
            &self.settings.preamble,
            shader.fingerprint,
            &contents,
        );

        self.backend.shader_source(shader.object, &source.segments());
        self.backend.compile_shader(shader.object);
        log::debug!("Recompiled {}", shader.key);

        if !self.backend.compile_status(shader.object) {
            let info_log = self.backend.shader_info_log(shader.object);
            let message = restore_file_names(&info_log, [(shader.fingerprint, path)]);
            log::error!("Error compiling {path}:\n{message}");
            report.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::CompileFailed,
                subject: path.to_owned(),
                program: None,
                message,
            });
        }

        report.recompiled.push(shader.key.clone());
    }

    fn relink_affected(&mut self, changed: &FxHashSet<ShaderId>, report: &mut UpdateReport) {
        let shaders = &self.shaders;

        for (index, program) in self.programs.iter_mut().enumerate() {
            let members = program.key.shaders();
            if !members.iter().any(|id| changed.contains(id)) {
                continue;
            }

            let names = members
                .iter()
                .map(|id| shaders[id.index()].key.path())
                .collect::<Vec<_>>()
                .join(", ");

            // Never link against a shader known to be broken; the program keeps
            // its last good build until the shader compiles again.
            let all_compiled = members
                .iter()
                .all(|id| self.backend.compile_status(shaders[id.index()].object));
            if !all_compiled {
                log::debug!("Holding program ({names}) until its shaders compile");
                continue;
            }

            self.backend.link_program(program.object);
            let linked = self.backend.link_status(program.object);
            let info_log = self.backend.program_info_log(program.object);
            let message = restore_file_names(
                &info_log,
                members.iter().map(|id| {
                    let shader = &shaders[id.index()];
                    (shader.fingerprint, shader.key.path())
                }),
            );

            let id = ProgramId(index as u32);
            let kind = if linked {
                program.public.publish(program.object);
                program.state = LinkState::Linked;
                log::info!("Successfully linked program ({names})");
                DiagnosticKind::Linked
            } else {
                program.public.invalidate();
                program.state = LinkState::LinkFailed;
                log::error!("Error linking program ({names}):\n{message}");
                DiagnosticKind::LinkFailed
            };

            report.relinked.push(id);
            report.diagnostics.push(Diagnostic {
                kind,
                subject: names,
                program: Some(id),
                message,
            });
        }
    }

    // ── Introspection ────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    #[inline]
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// The shader object backing `key`, if it has been registered.
    #[must_use]
    pub fn shader_object(&self, key: &ShaderKey) -> Option<ShaderObject> {
        self.shader_lookup
            .get(key)
            .map(|id| self.shaders[id.index()].object)
    }

    /// Internal program object. Unlike the public handle it is valid from
    /// registration on, whether or not it has linked.
    #[must_use]
    pub fn program_object(&self, id: ProgramId) -> Option<ProgramObject> {
        self.programs.get(id.index()).map(|program| program.object)
    }

    #[must_use]
    pub fn program_state(&self, id: ProgramId) -> Option<LinkState> {
        self.programs.get(id.index()).map(|program| program.state)
    }

    /// Member shaders of a program, in canonical order.
    pub fn program_members(&self, id: ProgramId) -> impl Iterator<Item = &ShaderKey> {
        self.programs
            .get(id.index())
            .into_iter()
            .flat_map(|program| program.key.shaders())
            .map(move |shader| &self.shaders[shader.index()].key)
    }

    /// A new handle onto an already registered program.
    #[must_use]
    pub fn handle(&self, id: ProgramId) -> Option<ProgramHandle> {
        self.programs
            .get(id.index())
            .map(|program| program.public.handle(id))
    }

    /// Current public value of a program, as seen through its handles.
    #[must_use]
    pub fn public_handle(&self, id: ProgramId) -> Option<u32> {
        self.programs.get(id.index()).map(|program| program.public.raw())
    }

    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    #[must_use]
    pub fn sources(&self) -> &S {
        &self.sources
    }

    #[inline]
    pub fn sources_mut(&mut self) -> &mut S {
        &mut self.sources
    }
}

impl<B: ShaderBackend, S: SourceProvider> Drop for ShaderSet<B, S> {
    fn drop(&mut self) {
        for shader in &self.shaders {
            self.backend.delete_shader(shader.object);
        }
        for program in &self.programs {
            self.backend.delete_program(program.object);
        }
    }
}
