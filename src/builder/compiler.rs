//! Build plan compilation.
//!
//! Resolves the option schema, selects modules and delegates step
//! generation to the strategy matching the platform.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::host::{HostProbe, SystemHost};
use crate::builder::plan::{BuildPlan, PlanParts, Requirement, SourceRequest};
use crate::builder::strategy::{SslLinkage, StepContext, StrategyKind};
use crate::core::package::SOURCE_DIR;
use crate::core::{ModuleRequirement, Os, OptionSchema, PackageInfo, PlanError, PlatformDescriptor};

/// Package OpenSSL requirements are satisfied from.
pub const OPENSSL_REFERENCE: &str = "OpenSSL/1.0.2l@conan/stable";

/// Default install directory name under the build root.
pub const PACKAGE_DIR: &str = "package";

/// Compiles (options, platform) pairs into build plans.
pub struct PlanCompiler<'a> {
    host: &'a dyn HostProbe,
    jobs: Option<usize>,
    install_prefix: Option<PathBuf>,
}

impl Default for PlanCompiler<'static> {
    fn default() -> Self {
        PlanCompiler::new(&SystemHost)
    }
}

impl<'a> PlanCompiler<'a> {
    /// Create a compiler that queries `host`.
    pub fn new(host: &'a dyn HostProbe) -> Self {
        PlanCompiler {
            host,
            jobs: None,
            install_prefix: None,
        }
    }

    /// Override the detected CPU count.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Override the install prefix (defaults to `<build root>/package`).
    pub fn with_install_prefix(mut self, prefix: Option<PathBuf>) -> Self {
        self.install_prefix = prefix;
        self
    }

    /// Compile a build plan.
    pub fn compile(
        &self,
        raw_options: &BTreeMap<String, String>,
        platform: &PlatformDescriptor,
        build_root: &Path,
    ) -> Result<BuildPlan, PlanError> {
        let strategy = StrategyKind::select(platform)?;
        let options = OptionSchema::resolve(raw_options, platform)?;
        let modules = ModuleRequirement::select(&options);

        tracing::debug!("planning {} build for {} ({})", strategy, platform, modules);

        let package = PackageInfo::qt();
        let source_dir = build_root.join(SOURCE_DIR);
        let install_dir = self
            .install_prefix
            .clone()
            .unwrap_or_else(|| build_root.join(PACKAGE_DIR));
        let jobs = self.jobs.unwrap_or_else(|| self.host.cpu_count()).max(1);

        let ctx = StepContext {
            source_dir: source_dir.clone(),
            install_dir: install_dir.clone(),
            jobs,
            host: self.host,
        };
        let steps = strategy.strategy().build_steps(&options, platform, &ctx)?;

        let requirements = requirements(&options, platform)?;
        let source = SourceRequest {
            repository: package.repository.clone(),
            branch: package.branch(),
            tag: package.tag(),
            source_dir,
        };

        Ok(BuildPlan::from_parts(PlanParts {
            package,
            platform: platform.clone(),
            strategy,
            options,
            modules,
            source,
            requirements,
            install_dir,
            jobs,
            steps,
        }))
    }
}

/// Compile a plan against the current host.
pub fn compile(
    raw_options: &BTreeMap<String, String>,
    platform: &PlatformDescriptor,
    build_root: &Path,
) -> Result<BuildPlan, PlanError> {
    PlanCompiler::default().compile(raw_options, platform, build_root)
}

/// Packages the build needs besides the sources.
fn requirements(
    options: &OptionSchema,
    platform: &PlatformDescriptor,
) -> Result<Vec<Requirement>, PlanError> {
    if platform.os != Os::Windows {
        return Ok(Vec::new());
    }

    let reqs = match SslLinkage::from_schema(options)? {
        SslLinkage::None => Vec::new(),
        SslLinkage::Enabled => vec![Requirement {
            reference: OPENSSL_REFERENCE.to_string(),
            build_only: true,
        }],
        SslLinkage::LinkedExternal => vec![Requirement {
            reference: OPENSSL_REFERENCE.to_string(),
            build_only: false,
        }],
    };
    Ok(reqs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::plan::StepPhase;
    use crate::core::manifest::BASE_LIBRARIES;
    use crate::core::{Arch, BuildType, PackageManifest};
    use crate::test_support::{linux_x64, raw_options, windows_msvc, FixedHost};

    #[test]
    fn test_scenario_linux_shared_x11() {
        let host = FixedHost::new().with_cpus(4);
        let platform = linux_x64(BuildType::Release);
        let raw = raw_options(&[("shared", "True"), ("x11extras", "True")]);

        let plan = PlanCompiler::new(&host)
            .compile(&raw, &platform, Path::new("/work"))
            .unwrap();
        let manifest = PackageManifest::build(plan.options(), &platform);

        assert_eq!(plan.strategy(), StrategyKind::Unix);
        assert!(manifest.libraries.contains(&"Qt5X11Extras".to_string()));
        let unsuffixed: Vec<String> = BASE_LIBRARIES.iter().map(|l| format!("Qt5{}", l)).collect();
        assert_eq!(manifest.libraries[..BASE_LIBRARIES.len()], unsuffixed[..]);

        let phases: Vec<_> = plan.steps().iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            vec![StepPhase::Configure, StepPhase::Build, StepPhase::Install]
        );
        let configure = &plan.steps()[0];
        assert!(configure.argv.contains(&"-xcb".to_string()));
        assert!(!configure.argv.contains(&"-static".to_string()));
        assert_eq!(plan.steps()[1].argv, vec!["-j", "4"]);
    }

    #[test]
    fn test_scenario_msvc_static_debug() {
        let host = FixedHost::new();
        let platform = windows_msvc("14", BuildType::Debug);
        let raw = raw_options(&[("shared", "False")]);

        let plan = PlanCompiler::new(&host)
            .compile(&raw, &platform, Path::new("C:/work"))
            .unwrap();
        let manifest = PackageManifest::build(plan.options(), &platform);

        assert_eq!(plan.strategy(), StrategyKind::Msvc);
        let configure = &plan.steps()[1];
        assert!(configure.argv.contains(&"-static".to_string()));
        assert!(configure.argv.contains(&"-debug".to_string()));
        assert_eq!(
            configure.env.set.get("QMAKESPEC").map(String::as_str),
            Some("win32-msvc2015")
        );
        assert!(manifest.libraries.iter().all(|l| l.ends_with('d')));
    }

    #[test]
    fn test_scenario_unknown_os() {
        let platform = PlatformDescriptor::new(
            Os::Other("Plan9".to_string()),
            Arch::X86_64,
            "gcc",
            BuildType::Release,
        );
        let err = PlanCompiler::new(&FixedHost::new())
            .compile(&BTreeMap::new(), &platform, Path::new("/work"))
            .unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let host = FixedHost::new().with_cpus(8);
        let platform = windows_msvc("12", BuildType::Release);
        let raw = raw_options(&[("openssl", "yes"), ("svg", "True")]);
        let compiler = PlanCompiler::new(&host);

        let a = compiler.compile(&raw, &platform, Path::new("/w")).unwrap();
        let b = compiler.compile(&raw, &platform, Path::new("/w")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
    }

    #[test]
    fn test_modules_are_metadata_not_steps() {
        let platform = linux_x64(BuildType::Release);
        let raw = raw_options(&[("websockets", "True")]);
        let plan = PlanCompiler::new(&FixedHost::new())
            .compile(&raw, &platform, Path::new("/w"))
            .unwrap();

        assert_eq!(
            plan.modules().as_slice(),
            &["qtbase", "qtwebsockets", "qtx11extras"]
        );
        assert!(plan
            .steps()
            .iter()
            .all(|s| !s.display_command().contains("init-repository")));
        assert_eq!(plan.source().tag, "v5.9.2");
        assert_eq!(plan.source().branch, "5.9");
        assert_eq!(plan.source().source_dir, Path::new("/w").join("qt5"));
    }

    #[test]
    fn test_openssl_requirements() {
        let platform = windows_msvc("14", BuildType::Release);
        let host = FixedHost::new();
        let compiler = PlanCompiler::new(&host);

        let plan = compiler
            .compile(&raw_options(&[("openssl", "yes")]), &platform, Path::new("/w"))
            .unwrap();
        assert_eq!(plan.requirements().len(), 1);
        assert!(plan.requirements()[0].build_only);

        let plan = compiler
            .compile(&raw_options(&[("openssl", "linked")]), &platform, Path::new("/w"))
            .unwrap();
        assert!(!plan.requirements()[0].build_only);

        let plan = compiler
            .compile(&BTreeMap::new(), &platform, Path::new("/w"))
            .unwrap();
        assert!(plan.requirements().is_empty());
    }

    #[test]
    fn test_jobs_and_prefix_overrides() {
        let host = FixedHost::new().with_cpus(32);
        let plan = PlanCompiler::new(&host)
            .with_jobs(Some(3))
            .with_install_prefix(Some(PathBuf::from("/opt/qt")))
            .compile(&BTreeMap::new(), &linux_x64(BuildType::Release), Path::new("/w"))
            .unwrap();

        assert_eq!(plan.jobs(), 3);
        assert_eq!(plan.install_dir(), Path::new("/opt/qt"));
        assert!(plan.steps()[0].argv.contains(&"/opt/qt".to_string()));
    }

    #[test]
    fn test_invalid_options_surface() {
        let err = PlanCompiler::new(&FixedHost::new())
            .compile(
                &raw_options(&[("bogus", "True")]),
                &linux_x64(BuildType::Release),
                Path::new("/w"),
            )
            .unwrap_err();
        assert_eq!(
            err,
            PlanError::UnknownOption {
                name: "bogus".to_string()
            }
        );
    }
}
