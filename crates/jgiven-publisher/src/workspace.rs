//! File access to the build workspace.
//!
//! The workspace may live somewhere the report generators cannot read
//! directly, so every access goes through [`Workspace`] and produces a local copy.

use std::io;
use std::path::{Path, PathBuf};

use crate::locator::ResultLocator;

/// Access to the files of a build workspace.
pub trait Workspace: Send + Sync {
    /// Human-readable location of the workspace, used in log output.
    fn location(&self) -> String;

    /// Copies every file matching the glob `pattern` into `dest`, keeping
    /// relative paths. Returns the number of files copied.
    fn copy_matching(&self, pattern: &str, dest: &Path) -> io::Result<usize>;

    /// Copies the workspace file at `relative` to the local path `dest`.
    ///
    /// Fails with `NotFound` if the file does not exist.
    fn copy_file(&self, relative: &str, dest: &Path) -> io::Result<()>;
}

/// A workspace on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    /// Creates a workspace rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a workspace-relative path. Absolute paths are returned unchanged.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl Workspace for LocalWorkspace {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn copy_matching(&self, pattern: &str, dest: &Path) -> io::Result<usize> {
        let locator = ResultLocator::new(pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        locator.copy_matching(&self.root, dest)
    }

    fn copy_file(&self, relative: &str, dest: &Path) -> io::Result<()> {
        let source = self.resolve(relative);
        if !source.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist in workspace {}", relative, self.location()),
            ));
        }
        std::fs::copy(&source, dest)?;
        Ok(())
    }
}
