//! Source assembly and diagnostic name recovery.
//!
//! Every compiled shader is built from four segments:
//!
//! ```text
//! #version <version>
//! #define <STAGE>_SHADER
//! #line 1 <preamble fingerprint>
//! <preamble>
//! #line 1 <file fingerprint>
//! <file contents>
//! ```
//!
//! The `#line` directives restart line numbering so compiler messages point
//! into the original file (or the preamble). Their second argument is a
//! "source string number", which the API only accepts as a small integer, so
//! a fingerprint of the path goes there instead of the path itself.
//! [`restore_file_names`] maps those numbers back to names in the info log.

use xxhash_rust::xxh3::xxh3_64;

use super::stage::ShaderStage;

/// Name substituted for the preamble fingerprint in diagnostics.
pub const PREAMBLE_NAME: &str = "preamble";

/// Stable 31-bit fingerprint of `name`.
///
/// The sign bit is cleared: some compilers read the `#line` source number as
/// signed and others as unsigned.
#[inline]
#[must_use]
pub fn fingerprint(name: &str) -> u32 {
    (xxh3_64(name.as_bytes()) as u32) & 0x7FFF_FFFF
}

/// Fingerprint used in the `#line` directive in front of the preamble.
#[inline]
#[must_use]
pub fn preamble_fingerprint() -> u32 {
    fingerprint(PREAMBLE_NAME)
}

/// The four source segments handed to the backend, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub version: String,
    pub defines: String,
    pub preamble: String,
    pub body: String,
}

impl ShaderSource {
    #[must_use]
    pub fn assemble(
        version: &str,
        stage: ShaderStage,
        preamble: &str,
        file_fingerprint: u32,
        contents: &str,
    ) -> Self {
        Self {
            version: format!("#version {version}\n"),
            defines: format!("#define {}\n", stage.define()),
            preamble: format!("#line 1 {}\n{preamble}\n", preamble_fingerprint()),
            body: format!("#line 1 {file_fingerprint}\n{contents}\n"),
        }
    }

    #[must_use]
    pub fn segments(&self) -> [&str; 4] {
        [&self.version, &self.defines, &self.preamble, &self.body]
    }
}

/// Replaces the preamble fingerprint and each `(fingerprint, name)` pair's
/// fingerprint with the readable name, everywhere in `log`.
#[must_use]
pub fn restore_file_names<'a, I>(log: &str, files: I) -> String
where
    I: IntoIterator<Item = (u32, &'a str)>,
{
    let mut restored = log.replace(&preamble_fingerprint().to_string(), PREAMBLE_NAME);
    for (hash, name) in files {
        restored = restored.replace(&hash.to_string(), name);
    }
    restored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_positive() {
        let a = fingerprint("shaders/foo.frag");
        assert_eq!(a, fingerprint("shaders/foo.frag"));
        assert_ne!(a, fingerprint("shaders/foo.vert"));
        assert!(i32::try_from(a).is_ok(), "sign bit must be masked");
        assert!(i32::try_from(preamble_fingerprint()).is_ok());
    }

    #[test]
    fn test_assemble_segments() {
        let hash = fingerprint("quad.vert");
        let src = ShaderSource::assemble("450 core", ShaderStage::Vertex, "#define PI 3.14", hash, "void main() {}");
        let [version, defines, preamble, body] = src.segments();

        assert_eq!(version, "#version 450 core\n");
        assert_eq!(defines, "#define VERTEX_SHADER\n");
        assert_eq!(preamble, format!("#line 1 {}\n#define PI 3.14\n", preamble_fingerprint()));
        assert_eq!(body, format!("#line 1 {hash}\nvoid main() {{}}\n"));
    }

    #[test]
    fn test_restore_file_names() {
        let frag = fingerprint("shaders/foo.frag");
        let log = format!(
            "ERROR: {frag}:3: 'x' : undeclared identifier\nERROR: {}:1: redefinition\nERROR: {frag}:9: syntax error\n",
            preamble_fingerprint()
        );

        let restored = restore_file_names(&log, [(frag, "shaders/foo.frag")]);
        assert_eq!(
            restored,
            "ERROR: shaders/foo.frag:3: 'x' : undeclared identifier\nERROR: preamble:1: redefinition\nERROR: shaders/foo.frag:9: syntax error\n"
        );
        assert!(!restored.contains(&frag.to_string()));
    }
}
