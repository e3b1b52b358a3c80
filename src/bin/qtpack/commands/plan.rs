//! `qtpack plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use qtpack::ops::plan;
use qtpack::util::fs::write_string;
use qtpack::util::GlobalContext;

pub fn execute(args: PlanArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let opts = super::plan_options(&args.target)?;

    let plan = plan(&ctx, &opts)?;
    let json = plan.to_json_pretty()?;

    match args.output {
        Some(path) => {
            write_string(&path, &json)?;
            eprintln!("       Wrote {} step(s) to {}", plan.steps().len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
