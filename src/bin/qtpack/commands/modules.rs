//! `qtpack modules` command

use anyhow::Result;

use crate::cli::TargetArgs;
use qtpack::ops::plan;
use qtpack::util::GlobalContext;

pub fn execute(args: TargetArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let opts = super::plan_options(&args)?;

    let plan = plan(&ctx, &opts)?;
    for module in plan.modules().iter() {
        println!("{}", module);
    }

    Ok(())
}
