//! Locating and staging JGiven result files.
//!
//! Patterns are Ant-style globs evaluated against paths relative to the
//! workspace root, always with `/` separators: `*` stays within one path
//! segment and `**/` spans any number of directories, including none.

use std::io;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{PublishError, Result};

/// Pattern used when none is configured.
pub const DEFAULT_RESULTS_PATTERN: &str = "**/json/*.json";

/// Returns `pattern`, or the default pattern when `pattern` is blank.
#[must_use]
pub fn results_pattern_or_default(pattern: Option<&str>) -> String {
    match pattern {
        Some(p) if !p.trim().is_empty() => p.trim().to_string(),
        _ => DEFAULT_RESULTS_PATTERN.to_string(),
    }
}

/// Finds result files matching a file mask and copies them into a staging directory.
///
/// A mask is one glob or several separated by commas, e.g.
/// `a/json/*.json, b/out/*.json`; a file matching any of them is selected.
#[derive(Debug, Clone)]
pub struct ResultLocator {
    pattern: String,
    matcher: GlobSet,
}

impl ResultLocator {
    /// Compiles the file mask `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::InvalidPattern` if any include is not a valid
    /// glob or the mask contains no include at all.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut includes = 0;
        for include in pattern.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let glob = GlobBuilder::new(include)
                .literal_separator(true)
                .build()
                .map_err(|e| PublishError::invalid_pattern(pattern, e.to_string()))?;
            builder.add(glob);
            includes += 1;
        }

        if includes == 0 {
            return Err(PublishError::invalid_pattern(pattern, "no include pattern given"));
        }

        let matcher = builder
            .build()
            .map_err(|e| PublishError::invalid_pattern(pattern, e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    /// Returns `true` if the workspace-relative `path` matches the pattern.
    #[must_use]
    pub fn is_match(&self, relative: &Path) -> bool {
        self.matcher.is_match(to_slash(relative))
    }

    /// Lists matching files below `root` as workspace-relative paths, sorted.
    ///
    /// Anything below `exclude` is skipped, so a staging directory inside the
    /// workspace never matches its own copies.
    pub fn find(&self, root: &Path, exclude: Option<&Path>) -> io::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let root = root.canonicalize()?;
        let exclude = match exclude {
            Some(dir) if dir.exists() => Some(dir.canonicalize()?),
            _ => None,
        };

        let walker = WalkDir::new(&root).follow_links(false).into_iter().filter_entry(|e| {
            exclude
                .as_deref()
                .map_or(true, |excluded| !e.path().starts_with(excluded))
        });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(io::Error::from(e)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable workspace entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            if self.is_match(relative) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Copies every file below `root` matching the pattern into `dest`,
    /// keeping the relative directory structure. Returns the number of files copied.
    ///
    /// Zero matches is not an error. Files already in `dest` are overwritten.
    pub fn copy_matching(&self, root: &Path, dest: &Path) -> io::Result<usize> {
        let files = self.find(root, Some(dest))?;
        if files.is_empty() {
            tracing::debug!(pattern = %self.pattern, root = %root.display(), "No result files matched");
            return Ok(0);
        }

        std::fs::create_dir_all(dest)?;
        for relative in &files {
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(root.join(relative), &target)?;
            tracing::trace!(file = %relative.display(), "Staged result file");
        }

        tracing::debug!(
            pattern = %self.pattern,
            count = files.len(),
            dest = %dest.display(),
            "Staged result files"
        );
        Ok(files.len())
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
