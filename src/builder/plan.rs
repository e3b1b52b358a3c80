//! Build plan types.
//!
//! A BuildPlan is the ordered list of external invocations needed to
//! configure, build and install the package for one (options, platform)
//! pair, plus the metadata the source-acquisition step needs. Plans are
//! produced by [`crate::builder::PlanCompiler`] and never modified
//! afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::env::EnvOverlay;
use crate::builder::strategy::StrategyKind;
use crate::core::{ModuleRequirement, OptionSchema, PackageInfo, PlatformDescriptor};

/// Phase a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    /// Toolchain environment setup and dump
    Environment,
    Configure,
    Build,
    Install,
}

impl StepPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepPhase::Environment => "environment",
            StepPhase::Configure => "configure",
            StepPhase::Build => "build",
            StepPhase::Install => "install",
        }
    }
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external invocation.
///
/// Steps do not execute themselves; see [`crate::builder::StepExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStep {
    pub phase: StepPhase,
    /// Working directory for the invocation
    pub working_dir: PathBuf,
    /// Program to run
    pub command: String,
    /// Arguments, in order
    pub argv: Vec<String>,
    /// Environment changes for this invocation only
    #[serde(skip_serializing_if = "EnvOverlay::is_empty")]
    pub env: EnvOverlay,
}

impl BuildStep {
    /// Create a new step.
    pub fn new(phase: StepPhase, working_dir: &Path, command: impl Into<String>) -> Self {
        BuildStep {
            phase,
            working_dir: working_dir.to_path_buf(),
            command: command.into(),
            argv: Vec::new(),
            env: EnvOverlay::default(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the environment overlay.
    pub fn env(mut self, env: EnvOverlay) -> Self {
        self.env = env;
        self
    }

    /// Display the command line for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.command.clone()];
        parts.extend(self.argv.iter().cloned());
        parts.join(" ")
    }
}

/// Where the source-acquisition step must put the sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRequest {
    pub repository: String,
    /// Branch carrying `init-repository` for this release line
    pub branch: String,
    /// Release tag to check out
    pub tag: String,
    /// Checkout directory
    pub source_dir: PathBuf,
}

/// A package the build depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Package reference (e.g., "OpenSSL/1.0.2l@conan/stable")
    pub reference: String,
    /// Needed only while building, not by consumers
    pub build_only: bool,
}

/// A complete build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    package: PackageInfo,
    platform: PlatformDescriptor,
    strategy: StrategyKind,
    options: OptionSchema,
    modules: ModuleRequirement,
    source: SourceRequest,
    requirements: Vec<Requirement>,
    install_dir: PathBuf,
    jobs: usize,
    steps: Vec<BuildStep>,
}

/// Parts a plan is assembled from.
#[derive(Debug, Clone)]
pub(crate) struct PlanParts {
    pub package: PackageInfo,
    pub platform: PlatformDescriptor,
    pub strategy: StrategyKind,
    pub options: OptionSchema,
    pub modules: ModuleRequirement,
    pub source: SourceRequest,
    pub requirements: Vec<Requirement>,
    pub install_dir: PathBuf,
    pub jobs: usize,
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    pub(crate) fn from_parts(parts: PlanParts) -> Self {
        BuildPlan {
            package: parts.package,
            platform: parts.platform,
            strategy: parts.strategy,
            options: parts.options,
            modules: parts.modules,
            source: parts.source,
            requirements: parts.requirements,
            install_dir: parts.install_dir,
            jobs: parts.jobs,
            steps: parts.steps,
        }
    }

    pub fn package(&self) -> &PackageInfo {
        &self.package
    }

    pub fn platform(&self) -> &PlatformDescriptor {
        &self.platform
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn options(&self) -> &OptionSchema {
        &self.options
    }

    /// Modules to acquire. Acquisition metadata only; not build steps.
    pub fn modules(&self) -> &ModuleRequirement {
        &self.modules
    }

    pub fn source(&self) -> &SourceRequest {
        &self.source
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Parallelism handed to the underlying build tool.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Serialize for inspection.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
