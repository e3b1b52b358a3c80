//! qtpack - build configuration compiler for Qt 5.9.2 packages
//!
//! This crate turns package options and a target platform into an ordered
//! build plan (configure, build, install), a module subset for source
//! acquisition and the manifest consumers link against. It also fetches
//! sources and runs plans.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities for qtpack unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a fixed host description and platform fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{compile, BuildPlan, PlanCompiler, StepExecutor};
pub use crate::core::{ModuleRequirement, OptionSchema, PackageManifest, PlanError, PlatformDescriptor};
pub use crate::util::context::GlobalContext;
