//! Build planning and execution.
//!
//! This module compiles package options and a target platform into an
//! ordered build plan and runs plans against the host.

pub mod compiler;
pub mod env;
pub mod executor;
pub mod host;
pub mod plan;
pub mod strategy;

pub use compiler::{compile, PlanCompiler};
pub use env::EnvOverlay;
pub use executor::StepExecutor;
pub use host::{HostProbe, SystemHost};
pub use plan::{BuildPlan, BuildStep, Requirement, SourceRequest, StepPhase};
pub use strategy::{BuildStrategy, StrategyKind};
