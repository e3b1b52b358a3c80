//! Implementation of `qtpack plan` and `qtpack manifest`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::builder::{BuildPlan, HostProbe, PlanCompiler, SystemHost};
use crate::core::{PackageManifest, PlatformDescriptor};
use crate::util::GlobalContext;

/// Options for planning.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Target platform
    pub platform: PlatformDescriptor,

    /// Raw option values from the command line
    pub options: BTreeMap<String, String>,

    /// Number of parallel jobs (overrides config and CPU count)
    pub jobs: Option<usize>,

    /// Install prefix (overrides config)
    pub install_prefix: Option<PathBuf>,

    /// Build root (overrides config)
    pub build_root: Option<PathBuf>,
}

impl PlanOptions {
    pub fn new(platform: PlatformDescriptor) -> Self {
        PlanOptions {
            platform,
            options: BTreeMap::new(),
            jobs: None,
            install_prefix: None,
            build_root: None,
        }
    }

    /// Config option defaults overlaid with the command-line values.
    pub fn merged_options(&self, ctx: &GlobalContext) -> BTreeMap<String, String> {
        let mut merged = ctx.config().options.clone();
        merged.extend(self.options.clone());
        merged
    }

    /// Effective build root.
    pub fn build_root(&self, ctx: &GlobalContext) -> PathBuf {
        match &self.build_root {
            Some(root) => ctx.cwd().join(root),
            None => ctx.build_root(),
        }
    }
}

/// Compile a build plan against the current host.
pub fn plan(ctx: &GlobalContext, opts: &PlanOptions) -> Result<BuildPlan> {
    plan_with_host(ctx, opts, &SystemHost)
}

/// Compile a build plan against `host`.
pub fn plan_with_host(
    ctx: &GlobalContext,
    opts: &PlanOptions,
    host: &dyn HostProbe,
) -> Result<BuildPlan> {
    let config = &ctx.config().build;
    let install_prefix = opts
        .install_prefix
        .clone()
        .or_else(|| config.install_prefix.clone())
        .map(|p| ctx.cwd().join(p));

    let plan = PlanCompiler::new(host)
        .with_jobs(opts.jobs.or(config.jobs))
        .with_install_prefix(install_prefix)
        .compile(&opts.merged_options(ctx), &opts.platform, &opts.build_root(ctx))?;

    tracing::debug!(
        "{} step(s) via {} for {}",
        plan.steps().len(),
        plan.strategy(),
        plan.platform()
    );
    Ok(plan)
}

/// Derive the consumer manifest for the given options.
///
/// Paths are rooted at the plan's install directory.
pub fn manifest(ctx: &GlobalContext, opts: &PlanOptions) -> Result<PackageManifest> {
    let plan = plan(ctx, opts)?;
    Ok(PackageManifest::build(plan.options(), plan.platform()).rooted(plan.install_dir()))
}
