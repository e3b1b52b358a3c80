//! Core data structures for qtpack.
//!
//! This module contains the value types the planner works on:
//! - Platform descriptors
//! - The option schema and its resolution
//! - Module selection
//! - The package manifest handed to consumers

pub mod errors;
pub mod manifest;
pub mod modules;
pub mod options;
pub mod package;
pub mod platform;

pub use errors::PlanError;
pub use manifest::PackageManifest;
pub use modules::ModuleRequirement;
pub use options::OptionSchema;
pub use package::PackageInfo;
pub use platform::{Arch, BuildType, Os, PlatformDescriptor};
