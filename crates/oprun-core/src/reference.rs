//! Reference file detection
//!
//! The reference file (`.env.op` by default) holds `KEY=op://vault/item/field`
//! pointers. oprun never reads it - only whether it exists decides how the
//! target is run.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::paths::Paths;

/// Whether the reference file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Present,
    Absent,
}

/// The reference file as configured, and what the existence check found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    /// Path as configured; this is what the injection tool receives
    pub path: PathBuf,
    /// Path resolved against the working directory
    pub resolved: PathBuf,
    pub presence: Presence,
}

impl ReferenceFile {
    /// Check for the reference file. Only regular files (or links to them) count.
    pub fn check(paths: &Paths, path: &Path) -> Self {
        let resolved = paths.resolve(path);
        let presence = if resolved.is_file() {
            Presence::Present
        } else {
            Presence::Absent
        };

        Self {
            path: path.to_path_buf(),
            resolved,
            presence,
        }
    }

    pub fn is_present(&self) -> bool {
        self.presence == Presence::Present
    }

    /// Warning shown when the target runs without injected secrets
    pub fn missing_warning(&self) -> String {
        let name = self.path.display();
        format!(
            "warning: {} not found - secrets will not be injected\n  \
             Create {} with secret references (e.g. API_KEY=op://vault/item/field) \
             to run with secrets from your vault.",
            name, name
        )
    }
}
