//! Implementation of `qtpack build`.

use anyhow::Result;

use crate::builder::{BuildPlan, StepExecutor};
use crate::ops::qtpack_plan::{plan, PlanOptions};
use crate::sources::{GitCheckout, Source};
use crate::util::GlobalContext;

/// Step logs directory under the build root.
pub const LOG_DIR: &str = "logs";

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub plan: PlanOptions,

    /// Log the steps without running anything
    pub dry_run: bool,

    /// Use the existing checkout as is
    pub skip_fetch: bool,

    /// Stream tool output
    pub verbose: bool,
}

/// Fetch the sources and run the plan.
pub fn build(ctx: &GlobalContext, opts: &BuildOptions) -> Result<BuildPlan> {
    let plan = plan(ctx, &opts.plan)?;

    for req in plan.requirements() {
        tracing::info!(
            "requires {}{}",
            req.reference,
            if req.build_only { " (build only)" } else { "" }
        );
    }

    if opts.dry_run {
        tracing::info!(
            "[dry-run] would check out {} {} into {} ({})",
            plan.source().repository,
            plan.source().tag,
            plan.source().source_dir.display(),
            plan.modules()
        );
    } else if !opts.skip_fetch {
        let mut source = GitCheckout::new(&plan.source().repository)?;
        if source.is_ready(plan.source(), plan.modules()) {
            tracing::info!("sources already at {}", plan.source().tag);
        } else {
            source.fetch(plan.source(), plan.modules())?;
        }
    }

    StepExecutor::new()
        .dry_run(opts.dry_run)
        .verbose(opts.verbose)
        .log_dir(opts.plan.build_root(ctx).join(LOG_DIR))
        .execute(&plan)?;

    Ok(plan)
}
