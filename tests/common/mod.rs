//! Shared test doubles: a recording GL-like backend and an in-memory file
//! system with a manual clock.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use shaderset::{ProgramObject, ShaderBackend, ShaderObject, ShaderStage, SourceProvider};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Mock Backend
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MockShader {
    pub stage: Option<ShaderStage>,
    pub segments: Vec<String>,
    pub compiled: bool,
    pub log: String,
    pub compile_count: usize,
    pub deleted: usize,
}

impl MockShader {
    pub fn source(&self) -> String {
        self.segments.concat()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockProgram {
    pub attached: Vec<u32>,
    pub linked: bool,
    pub log: String,
    pub link_count: usize,
    pub deleted: usize,
}

#[derive(Debug, Default)]
pub struct GlState {
    next_name: u32,
    pub shaders: HashMap<u32, MockShader>,
    pub programs: HashMap<u32, MockProgram>,
}

/// Compiles any source; a line containing `#error` fails the compile and a
/// line containing `LINK_ERROR` fails every program the shader is linked into.
/// Logs report `<source number>:<line>` the way GLSL compilers do, honouring
/// `#line` directives.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Rc<RefCell<GlState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shader(&self, object: ShaderObject) -> MockShader {
        self.state.borrow().shaders[&object.raw()].clone()
    }

    pub fn program(&self, object: ProgramObject) -> MockProgram {
        self.state.borrow().programs[&object.raw()].clone()
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn total_compiles(&self) -> usize {
        self.state.borrow().shaders.values().map(|s| s.compile_count).sum()
    }

    pub fn total_links(&self) -> usize {
        self.state.borrow().programs.values().map(|p| p.link_count).sum()
    }

    pub fn all_deleted_once(&self) -> bool {
        let state = self.state.borrow();
        state.shaders.values().all(|s| s.deleted == 1)
            && state.programs.values().all(|p| p.deleted == 1)
    }

    fn next_name(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.next_name += 1;
        state.next_name
    }
}

/// Finds the first line containing `marker`, reported as `source:line`.
fn locate(source: &str, marker: &str) -> Option<String> {
    let mut file = String::from("0");
    let mut line = 0u32;
    for text in source.lines() {
        if let Some(rest) = text.strip_prefix("#line ") {
            let mut parts = rest.split_whitespace();
            line = parts.next().and_then(|n| n.parse().ok()).unwrap_or(1) - 1;
            if let Some(number) = parts.next() {
                file = number.to_owned();
            }
            continue;
        }
        line += 1;
        if text.contains(marker) {
            return Some(format!("{file}:{line}"));
        }
    }
    None
}

impl ShaderBackend for MockBackend {
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderObject {
        let name = self.next_name();
        self.state.borrow_mut().shaders.insert(
            name,
            MockShader {
                stage: Some(stage),
                ..MockShader::default()
            },
        );
        ShaderObject::new(name).unwrap()
    }

    fn shader_source(&mut self, shader: ShaderObject, segments: &[&str]) {
        let mut state = self.state.borrow_mut();
        let record = state.shaders.get_mut(&shader.raw()).unwrap();
        record.segments = segments.iter().map(|s| (*s).to_owned()).collect();
    }

    fn compile_shader(&mut self, shader: ShaderObject) {
        let mut state = self.state.borrow_mut();
        let record = state.shaders.get_mut(&shader.raw()).unwrap();
        record.compile_count += 1;
        match locate(&record.source(), "#error") {
            Some(at) => {
                record.compiled = false;
                record.log = format!("ERROR: {at}: '#error' : user error\n");
            }
            None => {
                record.compiled = true;
                record.log.clear();
            }
        }
    }

    fn compile_status(&self, shader: ShaderObject) -> bool {
        self.state.borrow().shaders[&shader.raw()].compiled
    }

    fn shader_info_log(&self, shader: ShaderObject) -> String {
        self.state.borrow().shaders[&shader.raw()].log.clone()
    }

    fn create_program(&mut self) -> ProgramObject {
        let name = self.next_name();
        self.state
            .borrow_mut()
            .programs
            .insert(name, MockProgram::default());
        ProgramObject::new(name).unwrap()
    }

    fn attach_shader(&mut self, program: ProgramObject, shader: ShaderObject) {
        self.state
            .borrow_mut()
            .programs
            .get_mut(&program.raw())
            .unwrap()
            .attached
            .push(shader.raw());
    }

    fn link_program(&mut self, program: ProgramObject) {
        let mut state = self.state.borrow_mut();
        let attached = state.programs[&program.raw()].attached.clone();

        let mut log = String::new();
        for shader in &attached {
            let shader = &state.shaders[shader];
            if !shader.compiled {
                log.push_str("ERROR: attached shader is not compiled\n");
            } else if let Some(at) = locate(&shader.source(), "LINK_ERROR") {
                log.push_str(&format!("ERROR: {at}: undefined reference\n"));
            }
        }

        let record = state.programs.get_mut(&program.raw()).unwrap();
        record.link_count += 1;
        record.linked = log.is_empty();
        record.log = log;
    }

    fn link_status(&self, program: ProgramObject) -> bool {
        self.state.borrow().programs[&program.raw()].linked
    }

    fn program_info_log(&self, program: ProgramObject) -> String {
        self.state.borrow().programs[&program.raw()].log.clone()
    }

    fn delete_shader(&mut self, shader: ShaderObject) {
        self.state
            .borrow_mut()
            .shaders
            .get_mut(&shader.raw())
            .unwrap()
            .deleted += 1;
    }

    fn delete_program(&mut self, program: ProgramObject) {
        self.state
            .borrow_mut()
            .programs
            .get_mut(&program.raw())
            .unwrap()
            .deleted += 1;
    }
}

// ============================================================================
// In-memory Sources
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryFile {
    modified: u64,
    contents: String,
    readable: bool,
}

/// Files with explicit timestamps. Every write advances a shared clock, so a
/// write always makes the file newer than anything seen before.
#[derive(Debug, Default)]
pub struct MemorySources {
    clock: u64,
    files: HashMap<String, MemoryFile>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let mut sources = Self::new();
        for (path, contents) in files {
            sources.write(path, contents);
        }
        sources
    }

    pub fn write(&mut self, path: &str, contents: &str) {
        self.clock += 1;
        self.files.insert(
            path.to_owned(),
            MemoryFile {
                modified: self.clock,
                contents: contents.to_owned(),
                readable: true,
            },
        );
    }

    /// Bumps the timestamp without changing the contents.
    pub fn touch(&mut self, path: &str) {
        self.clock += 1;
        self.files.get_mut(path).unwrap().modified = self.clock;
    }

    pub fn remove(&mut self, path: &str) {
        self.files.remove(path);
    }

    /// The file keeps answering stat calls but refuses reads.
    pub fn make_unreadable(&mut self, path: &str) {
        self.files.get_mut(path).unwrap().readable = false;
    }
}

impl SourceProvider for MemorySources {
    fn modified(&self, path: &str) -> io::Result<u64> {
        self.files
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not found")))
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        match self.files.get(path) {
            Some(file) if file.readable => Ok(file.contents.clone()),
            Some(_) => Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied")),
            None => Err(io::Error::new(io::ErrorKind::NotFound, format!("{path} not found"))),
        }
    }
}
