//! High-level operations.
//!
//! This module contains the implementation of qtpack commands.

pub mod matrix;
pub mod qtpack_build;
pub mod qtpack_plan;
pub mod sysdeps;

pub use matrix::{common_builds, BuildConfiguration};
pub use qtpack_build::{build, BuildOptions};
pub use qtpack_plan::{manifest, plan, PlanOptions};
pub use sysdeps::{detect_distro, install_system_packages, system_packages, AptInstaller, PackageInstaller};
