//! MinGW build strategy.

use crate::builder::env::EnvOverlay;
use crate::builder::plan::{BuildStep, StepPhase};
use crate::core::{OptionSchema, PlanError, PlatformDescriptor};

use super::{common_configure_args, source_subdir, BuildStrategy, StepContext, StrategyKind};

/// Toolchain directory that configure would otherwise pick clang from.
pub const CONFLICTING_PATH_DIR: &str = "C:\\Program Files\\LLVM\\bin";

const MINGW_PATH_DIRS: &[&str] = &["bin", "qtbase/bin", "gnuwin32/bin", "qtrepotools/bin"];

const MAKE: &str = "mingw32-make";

/// MinGW strategy (Windows, non-Visual Studio compilers).
#[derive(Debug, Clone, Copy, Default)]
pub struct MingwStrategy;

impl BuildStrategy for MingwStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Mingw
    }

    fn build_steps(
        &self,
        schema: &OptionSchema,
        platform: &PlatformDescriptor,
        ctx: &StepContext<'_>,
    ) -> Result<Vec<BuildStep>, PlanError> {
        let env = EnvOverlay::new()
            .prepend_path(
                MINGW_PATH_DIRS
                    .iter()
                    .map(|d| source_subdir(&ctx.source_dir, d)),
            )
            .var("QMAKESPEC", "win32-g++")
            .remove_path(CONFLICTING_PATH_DIR);

        let mut args = common_configure_args(schema, platform, &ctx.install_dir)?;
        args.extend([
            "-developer-build".to_string(),
            "-opengl".to_string(),
            schema.get_str("opengl")?.to_string(),
            "-platform".to_string(),
            "win32-g++".to_string(),
        ]);

        tracing::info!("Using '{}' threads", ctx.jobs);

        let configure = ctx.source_dir.join("configure.bat");
        Ok(vec![
            BuildStep::new(StepPhase::Configure, &ctx.source_dir, configure.display().to_string())
                .args(args)
                .env(env.clone()),
            BuildStep::new(StepPhase::Build, &ctx.source_dir, MAKE)
                .args(["-j".to_string(), ctx.jobs.to_string()])
                .env(env.clone()),
            BuildStep::new(StepPhase::Install, &ctx.source_dir, MAKE)
                .arg("install")
                .env(env),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::core::{Arch, BuildType, Os};
    use crate::test_support::FixedHost;

    fn steps(pairs: &[(&str, &str)]) -> Vec<BuildStep> {
        let platform = PlatformDescriptor::new(Os::Windows, Arch::X86_64, "gcc", BuildType::Release);
        let raw: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let schema = OptionSchema::resolve(&raw, &platform).unwrap();
        let host = FixedHost::new();
        let ctx = StepContext {
            source_dir: PathBuf::from("build/qt5"),
            install_dir: PathBuf::from("build/package"),
            jobs: 4,
            host: &host,
        };
        MingwStrategy.build_steps(&schema, &platform, &ctx).unwrap()
    }

    #[test]
    fn test_configure_build_install() {
        let s = steps(&[]);
        assert_eq!(s.len(), 3);
        assert!(s[0].command.ends_with("configure.bat"));
        assert_eq!(s[1].display_command(), "mingw32-make -j 4");
        assert_eq!(s[2].display_command(), "mingw32-make install");
    }

    #[test]
    fn test_every_step_filters_llvm_from_path() {
        for step in steps(&[]) {
            assert_eq!(step.env.path_remove, vec![PathBuf::from(CONFLICTING_PATH_DIR)]);
            assert_eq!(
                step.env.set.get("QMAKESPEC").map(String::as_str),
                Some("win32-g++")
            );
            assert_eq!(step.env.path_prepend.len(), 4);
        }
    }

    #[test]
    fn test_mingw_flags() {
        let s = steps(&[("opengl", "dynamic"), ("shared", "False")]);
        let argv = &s[0].argv;
        assert_eq!(argv[0], "-static");
        assert!(argv.contains(&"-developer-build".to_string()));
        assert!(argv.contains(&"dynamic".to_string()));
        assert!(argv.ends_with(&["-platform".to_string(), "win32-g++".to_string()]));
        assert!(!argv.iter().any(|a| a.contains("openssl")));
    }
}
