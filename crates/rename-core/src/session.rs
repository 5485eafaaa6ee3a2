use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::decision::{Decision, DecisionGate};
use crate::renamer::NameReplacer;
use crate::{RenameError, Result};

/// Directory basenames whose whole subtree is left alone. Matched exactly
/// against the basename, never as a glob.
pub const EXCLUDED_DIR_NAMES: [&str; 8] = [
    "node_modules",
    "__pycache__",
    "tests/__pycache__/",
    ".git",
    ".ruff_cache",
    ".next",
    "coverage",
    "dist",
];

/// State for one rename run: the names, the project root, the excluded
/// directories and the two decision flags.
pub struct RenameSession {
    pub(crate) root: PathBuf,
    pub(crate) replacer: NameReplacer,
    pub(crate) excluded_dir_names: HashSet<String>,
    pub(crate) gate: DecisionGate,
}

impl RenameSession {
    pub fn new(root: impl Into<PathBuf>, old_name: &str, new_name: &str) -> Result<Self> {
        if old_name.is_empty() {
            return Err(RenameError::EmptyInput { field: "old name" });
        }
        if new_name.is_empty() {
            return Err(RenameError::EmptyInput { field: "new name" });
        }
        // The new name ends up in file basenames.
        if new_name.contains(['/', '\\']) {
            return Err(RenameError::InvalidName {
                name: new_name.to_string(),
                reason: "file names cannot contain path separators",
            });
        }

        Ok(Self {
            root: root.into(),
            replacer: NameReplacer::new(old_name, new_name)?,
            excluded_dir_names: EXCLUDED_DIR_NAMES.iter().map(|name| name.to_string()).collect(),
            gate: DecisionGate::default(),
        })
    }

    /// Seeds the contents and file-name flags, e.g. from command line switches.
    pub fn with_decisions(mut self, contents: Decision, file_names: Decision) -> Self {
        self.gate = DecisionGate::new(contents, file_names);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn old_name(&self) -> &str {
        self.replacer.old_name()
    }

    pub fn new_name(&self) -> &str {
        self.replacer.new_name()
    }

    pub fn gate(&self) -> &DecisionGate {
        &self.gate
    }

    /// A session whose old and new names match has nothing to do.
    pub fn is_noop(&self) -> bool {
        self.replacer.old_name() == self.replacer.new_name()
    }

    pub fn is_excluded(&self, dir_name: &OsStr) -> bool {
        dir_name
            .to_str()
            .is_some_and(|name| self.excluded_dir_names.contains(name))
    }
}

/// Strips the project root from `path` for display, falling back to the
/// full path when it lies outside the root.
pub(crate) fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
