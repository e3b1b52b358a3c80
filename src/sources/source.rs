//! Source trait - common interface for source acquisition.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::plan::SourceRequest;
use crate::core::ModuleRequirement;

/// Something that can put the package sources on disk.
pub trait Source {
    /// Get the source name for display.
    fn name(&self) -> &str;

    /// Check if the request is already on disk with every module in
    /// `modules` checked out.
    fn is_ready(&self, request: &SourceRequest, modules: &ModuleRequirement) -> bool;

    /// Acquire the sources for `request`, limited to `modules`.
    ///
    /// Returns the checkout directory.
    fn fetch(&mut self, request: &SourceRequest, modules: &ModuleRequirement) -> Result<PathBuf>;
}
