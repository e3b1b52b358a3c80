//! `qtpack matrix` command

use anyhow::Result;

use crate::cli::MatrixArgs;
use qtpack::ops::common_builds;
use qtpack::PlanCompiler;

pub fn execute(args: MatrixArgs) -> Result<()> {
    let platform = super::platform(&args.platform)?;
    let builds = common_builds(
        &platform.os,
        &platform.compiler,
        platform.compiler_version.as_deref(),
        platform.arch,
    );

    if args.plans {
        let compiler = PlanCompiler::default();
        let cwd = std::env::current_dir()?;
        let mut plans = Vec::with_capacity(builds.len());
        for build in &builds {
            plans.push(compiler.compile(&build.options, &build.platform, &cwd)?);
        }
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for build in &builds {
        let options: Vec<String> = build
            .options
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        println!("{}  {}", build.platform, options.join(" "));
    }

    Ok(())
}
