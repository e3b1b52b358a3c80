//! Per-step environment overlays.
//!
//! An overlay describes environment changes for one external invocation.
//! It is applied to the child process only; the parent environment is
//! never modified, so nothing needs to be undone after the step, whether
//! it succeeded or not.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment changes scoped to a single build step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvOverlay {
    /// Variables to set
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set: BTreeMap<String, String>,
    /// Directories prepended to PATH, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_prepend: Vec<PathBuf>,
    /// Directories filtered out of PATH
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_remove: Vec<PathBuf>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        EnvOverlay::default()
    }

    /// Set a variable.
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.insert(key.into(), value.into());
        self
    }

    /// Prepend directories to PATH.
    pub fn prepend_path(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.path_prepend.extend(dirs);
        self
    }

    /// Filter a directory out of PATH.
    pub fn remove_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.path_remove.push(dir.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.path_prepend.is_empty() && self.path_remove.is_empty()
    }

    /// Whether the overlay changes PATH.
    pub fn touches_path(&self) -> bool {
        !self.path_prepend.is_empty() || !self.path_remove.is_empty()
    }

    /// Compute the PATH entries a child should see given the parent's
    /// entries.
    pub fn path_entries(&self, current: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
        let mut entries = self.path_prepend.clone();
        entries.extend(current);
        entries.retain(|entry| !self.path_remove.iter().any(|removed| removed == entry));
        entries
    }

    /// Compute the PATH value for a child from the current process PATH.
    pub fn child_path(&self) -> Option<OsString> {
        let current = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect::<Vec<_>>())
            .unwrap_or_default();
        std::env::join_paths(self.path_entries(current)).ok()
    }

    /// All variables to hand to the child, PATH included when changed.
    pub fn child_vars(&self) -> Vec<(String, OsString)> {
        let mut vars: Vec<(String, OsString)> = self
            .set
            .iter()
            .map(|(k, v)| (k.clone(), OsString::from(v)))
            .collect();
        if self.touches_path() {
            match self.child_path() {
                Some(path) => vars.push(("PATH".to_string(), path)),
                None => tracing::warn!("could not join PATH entries; leaving PATH unchanged"),
            }
        }
        vars
    }
}
