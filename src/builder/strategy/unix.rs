//! Linux and macOS build strategy.

use crate::builder::plan::{BuildStep, StepPhase};
use crate::core::{Arch, Os, OptionSchema, PlanError, PlatformDescriptor};

use super::{common_configure_args, BuildStrategy, StepContext, StrategyKind};

/// Make-based strategy for Unix-like hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixStrategy;

impl UnixStrategy {
    /// OS-specific configure flags.
    fn platform_args(&self, platform: &PlatformDescriptor) -> Vec<String> {
        let (os_flag, spec_32) = match platform.os {
            Os::Macos => ("-no-framework", "macx-clang-32"),
            _ => ("-xcb", "linux-g++-32"),
        };

        let mut args = vec!["-silent".to_string(), os_flag.to_string()];
        if platform.arch == Arch::X86 {
            args.extend(["-platform".to_string(), spec_32.to_string()]);
        }
        args
    }
}

impl BuildStrategy for UnixStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Unix
    }

    fn build_steps(
        &self,
        schema: &OptionSchema,
        platform: &PlatformDescriptor,
        ctx: &StepContext<'_>,
    ) -> Result<Vec<BuildStep>, PlanError> {
        let mut args = common_configure_args(schema, platform, &ctx.install_dir)?;
        args.extend(self.platform_args(platform));

        tracing::info!("Using '{}' threads", ctx.jobs);

        let configure = ctx.source_dir.join("configure");
        Ok(vec![
            BuildStep::new(StepPhase::Configure, &ctx.source_dir, configure.display().to_string())
                .args(args),
            BuildStep::new(StepPhase::Build, &ctx.source_dir, "make")
                .args(["-j".to_string(), ctx.jobs.to_string()]),
            BuildStep::new(StepPhase::Install, &ctx.source_dir, "make").arg("install"),
        ])
    }
}
