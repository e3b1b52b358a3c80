//! `qtpack manifest` command

use anyhow::Result;

use crate::cli::TargetArgs;
use qtpack::ops::manifest;
use qtpack::util::GlobalContext;

pub fn execute(args: TargetArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let opts = super::plan_options(&args)?;

    let manifest = manifest(&ctx, &opts)?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);

    Ok(())
}
