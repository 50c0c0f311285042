//! Shader source access.
//!
//! [`SourceProvider`] supplies the two file operations the cache needs:
//! a modification timestamp for change polling and the full text of a file.
//! [`FsSourceProvider`] implements them over `std::fs`.

use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Timestamp and content access for shader files.
pub trait SourceProvider {
    /// Modification time of `path`. Only comparisons between values returned
    /// for the same path within one run are meaningful; larger is newer.
    fn modified(&self, path: &str) -> io::Result<u64>;

    /// Entire contents of `path`.
    fn read_to_string(&self, path: &str) -> io::Result<String>;
}

/// Local file system provider.
///
/// Relative shader paths are resolved against `root_path`.
#[derive(Debug, Clone, Default)]
pub struct FsSourceProvider {
    root_path: PathBuf,
}

impl FsSourceProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root_path.join(path)
    }
}

impl SourceProvider for FsSourceProvider {
    fn modified(&self, path: &str) -> io::Result<u64> {
        let modified = std::fs::metadata(self.resolve(path))?.modified()?;
        let since_epoch = modified
            .duration_since(UNIX_EPOCH)
            .map_err(io::Error::other)?;
        Ok(u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX))
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }
}
