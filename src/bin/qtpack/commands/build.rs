//! `qtpack build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use qtpack::ops::{build, BuildOptions};
use qtpack::util::GlobalContext;

pub fn execute(args: BuildArgs, verbose: bool) -> Result<()> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(verbose);

    let opts = BuildOptions {
        plan: super::plan_options(&args.target)?,
        dry_run: args.dry_run,
        skip_fetch: args.skip_fetch,
        verbose: ctx.is_verbose(),
    };

    let plan = build(&ctx, &opts)?;

    if !args.dry_run {
        eprintln!(
            "   Installed {} {} to {}",
            plan.package().name,
            plan.package().version,
            plan.install_dir().display()
        );
    }

    Ok(())
}
