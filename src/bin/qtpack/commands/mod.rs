//! Command implementations

pub mod build;
pub mod completions;
pub mod manifest;
pub mod matrix;
pub mod modules;
pub mod options;
pub mod plan;
pub mod sysdeps;

use anyhow::{anyhow, Result};

use crate::cli::{PlatformArgs, TargetArgs};
use qtpack::core::options::parse_option_pairs;
use qtpack::core::{Arch, BuildType, Os, PlanError, PlatformDescriptor};
use qtpack::ops::PlanOptions;

/// Parse `--arch`, falling back to the host architecture.
pub fn parse_arch(arch: Option<&str>) -> Result<Arch> {
    match arch {
        Some(a) => Ok(a.parse::<Arch>()?),
        None => Ok(Arch::host().ok_or_else(|| PlanError::UnsupportedPlatform {
            reason: format!("unknown host architecture `{}`", std::env::consts::ARCH),
        })?),
    }
}

/// Build the target descriptor; unspecified fields describe the host.
pub fn platform(args: &PlatformArgs) -> Result<PlatformDescriptor> {
    let build_type = args
        .build_type
        .parse::<BuildType>()
        .map_err(|e| anyhow!("invalid build type: {}", e))?;
    let os = args
        .os
        .as_deref()
        .map(|s| Os::from(s.to_string()))
        .unwrap_or_else(Os::host);
    let arch = parse_arch(args.arch.as_deref())?;
    let compiler = args
        .compiler
        .clone()
        .unwrap_or_else(|| os.default_compiler().to_string());

    let platform = PlatformDescriptor::new(os, arch, compiler, build_type);
    Ok(match &args.compiler_version {
        Some(version) => platform.with_compiler_version(version.clone()),
        None => platform,
    })
}

/// Collect planning options from the command line.
pub fn plan_options(args: &TargetArgs) -> Result<PlanOptions> {
    let mut opts = PlanOptions::new(platform(&args.platform)?);
    opts.options = parse_option_pairs(&args.options)?;
    opts.jobs = args.jobs;
    opts.install_prefix = args.prefix.clone();
    opts.build_root = args.build_root.clone();
    Ok(opts)
}
