//! Visual Studio build strategy.

use crate::builder::env::EnvOverlay;
use crate::builder::plan::{BuildStep, StepPhase};
use crate::core::{OptionSchema, PlanError, PlatformDescriptor};

use super::{common_configure_args, source_subdir, BuildStrategy, StepContext, StrategyKind};

/// How the build links against OpenSSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslLinkage {
    /// No SSL support
    None,
    /// SSL loaded at runtime
    Enabled,
    /// SSL linked against an external OpenSSL
    LinkedExternal,
}

impl SslLinkage {
    /// Read from the `openssl` option.
    pub fn from_schema(schema: &OptionSchema) -> Result<Self, PlanError> {
        match schema.get_str("openssl")? {
            "no" => Ok(SslLinkage::None),
            "yes" => Ok(SslLinkage::Enabled),
            "linked" => Ok(SslLinkage::LinkedExternal),
            other => Err(PlanError::InvalidOptionValue {
                name: "openssl".to_string(),
                value: other.to_string(),
                allowed: vec!["no".to_string(), "yes".to_string(), "linked".to_string()],
            }),
        }
    }

    pub fn as_flag(&self) -> &'static str {
        match self {
            SslLinkage::None => "-no-openssl",
            SslLinkage::Enabled => "-openssl",
            SslLinkage::LinkedExternal => "-openssl-linked",
        }
    }
}

/// qmake spec for a Visual Studio major version.
pub fn msvc_mkspec(version: &str) -> Option<&'static str> {
    match version {
        "14" => Some("win32-msvc2015"),
        "12" => Some("win32-msvc2013"),
        "11" => Some("win32-msvc2012"),
        "10" => Some("win32-msvc2010"),
        _ => None,
    }
}

/// Directories prepended to PATH while building with Visual Studio.
const MSVC_PATH_DIRS: &[&str] = &["qtbase/bin", "gnuwin32/bin", "qtrepotools/bin"];

/// Visual Studio strategy (Windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct MsvcStrategy;

impl MsvcStrategy {
    /// Pick jom when available, nmake otherwise.
    fn build_tool(&self, ctx: &StepContext<'_>) -> (String, Vec<String>) {
        match ctx.host.find_program("jom") {
            Some(path) => {
                tracing::debug!("found jom at {}", path.display());
                ("jom".to_string(), vec!["-j".to_string(), ctx.jobs.to_string()])
            }
            None => ("nmake".to_string(), Vec::new()),
        }
    }

    /// Locate `vcvarsall.bat`.
    ///
    /// Order: PATH, then the `VS<ver>0COMNTOOLS` variable, then the
    /// default install location for the version.
    fn vcvarsall(&self, platform: &PlatformDescriptor, ctx: &StepContext<'_>) -> Result<String, PlanError> {
        if let Some(path) = ctx.host.find_program("vcvarsall.bat") {
            return Ok(path.display().to_string());
        }

        let Some(version) = platform.compiler_version.as_deref() else {
            return Err(PlanError::ExternalToolNotFound {
                tool: "vcvarsall.bat".to_string(),
            });
        };

        if let Some(tools) = ctx.host.env_var(&format!("VS{}0COMNTOOLS", version)) {
            return Ok(format!(
                "{}\\..\\..\\VC\\vcvarsall.bat",
                tools.trim_end_matches('\\')
            ));
        }

        Ok(format!(
            "C:\\Program Files (x86)\\Microsoft Visual Studio {}.0\\VC\\vcvarsall.bat",
            version
        ))
    }
}

impl BuildStrategy for MsvcStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Msvc
    }

    fn build_steps(
        &self,
        schema: &OptionSchema,
        platform: &PlatformDescriptor,
        ctx: &StepContext<'_>,
    ) -> Result<Vec<BuildStep>, PlanError> {
        let (tool, tool_args) = self.build_tool(ctx);
        tracing::info!("Using '{} {}' to build", tool, tool_args.join(" "));

        let mut env = EnvOverlay::new().prepend_path(
            MSVC_PATH_DIRS
                .iter()
                .map(|d| source_subdir(&ctx.source_dir, d)),
        );

        let mut args = common_configure_args(schema, platform, &ctx.install_dir)?;

        match platform.compiler_version.as_deref().map(|v| (v, msvc_mkspec(v))) {
            Some((_, Some(spec))) => {
                env = env.var("QMAKESPEC", spec);
                args.extend(["-platform".to_string(), spec.to_string()]);
            }
            Some((version, None)) => {
                tracing::warn!("no qmake spec known for Visual Studio {}", version);
            }
            None => tracing::warn!("Visual Studio version not set; relying on vcvars defaults"),
        }

        args.extend(["-opengl".to_string(), schema.get_str("opengl")?.to_string()]);
        args.push(SslLinkage::from_schema(schema)?.as_flag().to_string());

        let vcvars = self.vcvarsall(platform, ctx)?;
        let arch = platform.arch.vcvars_arch();
        // Every step runs in a fresh cmd with the toolchain environment.
        let step = |phase| {
            BuildStep::new(phase, &ctx.source_dir, "cmd")
                .args(["/c", "call", vcvars.as_str(), arch, "&&"])
                .env(env.clone())
        };

        Ok(vec![
            step(StepPhase::Environment).arg("set"),
            step(StepPhase::Configure).arg("configure").args(args),
            step(StepPhase::Build).arg(tool.as_str()).args(tool_args),
            step(StepPhase::Install).arg(tool.as_str()).arg("install"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::core::{Arch, BuildType, Os};
    use crate::test_support::FixedHost;

    fn vs(version: &str, build_type: BuildType) -> PlatformDescriptor {
        PlatformDescriptor::new(Os::Windows, Arch::X86_64, "Visual Studio", build_type)
            .with_compiler_version(version)
    }

    fn steps(
        pairs: &[(&str, &str)],
        platform: &PlatformDescriptor,
        host: &FixedHost,
    ) -> Vec<BuildStep> {
        let raw: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let schema = OptionSchema::resolve(&raw, platform).unwrap();
        let ctx = StepContext {
            source_dir: PathBuf::from("C:/build/qt5"),
            install_dir: PathBuf::from("C:/build/package"),
            jobs: 8,
            host,
        };
        MsvcStrategy.build_steps(&schema, platform, &ctx).unwrap()
    }

    #[test]
    fn test_four_phases_in_order() {
        let s = steps(&[], &vs("14", BuildType::Release), &FixedHost::new());
        let phases: Vec<_> = s.iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            vec![
                StepPhase::Environment,
                StepPhase::Configure,
                StepPhase::Build,
                StepPhase::Install
            ]
        );
        assert!(s.iter().all(|s| s.working_dir == Path::new("C:/build/qt5")));
    }

    #[test]
    fn test_static_debug_vs14() {
        let s = steps(&[("shared", "False")], &vs("14", BuildType::Debug), &FixedHost::new());
        let configure = &s[1];

        assert!(configure.argv.contains(&"-static".to_string()));
        assert!(configure.argv.contains(&"-debug".to_string()));
        assert!(configure.argv.contains(&"win32-msvc2015".to_string()));
        assert_eq!(
            configure.env.set.get("QMAKESPEC").map(String::as_str),
            Some("win32-msvc2015")
        );
    }

    #[test]
    fn test_opengl_and_ssl_flags() {
        let s = steps(
            &[("opengl", "dynamic"), ("openssl", "linked")],
            &vs("12", BuildType::Release),
            &FixedHost::new(),
        );
        let argv = &s[1].argv;
        let gl = argv.iter().position(|a| a == "-opengl").unwrap();
        assert_eq!(argv[gl + 1], "dynamic");
        assert!(argv.contains(&"-openssl-linked".to_string()));
        assert!(!argv.contains(&"-no-openssl".to_string()));
        assert!(argv.contains(&"win32-msvc2013".to_string()));
    }

    #[test]
    fn test_ssl_default_is_disabled() {
        let s = steps(&[], &vs("14", BuildType::Release), &FixedHost::new());
        assert!(s[1].argv.contains(&"-no-openssl".to_string()));
    }

    #[test]
    fn test_jom_preferred_when_present() {
        let host = FixedHost::new().with_program("jom", "C:/tools/jom.exe");
        let s = steps(&[], &vs("14", BuildType::Release), &host);
        assert!(s[2].display_command().ends_with("&& jom -j 8"));
        assert!(s[3].display_command().ends_with("&& jom install"));
    }

    #[test]
    fn test_nmake_fallback() {
        let s = steps(&[], &vs("14", BuildType::Release), &FixedHost::new());
        assert!(s[2].display_command().ends_with("&& nmake"));
        assert!(s[3].display_command().ends_with("&& nmake install"));
    }

    #[test]
    fn test_vcvars_from_comntools() {
        let host = FixedHost::new().with_env("VS140COMNTOOLS", "D:\\VS14\\Common7\\Tools\\");
        let s = steps(&[], &vs("14", BuildType::Release), &host);
        assert_eq!(s[0].argv[2], "D:\\VS14\\Common7\\Tools\\..\\..\\VC\\vcvarsall.bat");
        assert_eq!(s[0].argv[3], "amd64");
    }

    #[test]
    fn test_unknown_version_injects_nothing() {
        let s = steps(&[], &vs("15", BuildType::Release), &FixedHost::new());
        assert!(s[1].env.set.get("QMAKESPEC").is_none());
        assert!(!s[1].argv.contains(&"-platform".to_string()));
    }

    #[test]
    fn test_missing_version_and_vcvars_fails() {
        let platform =
            PlatformDescriptor::new(Os::Windows, Arch::X86, "Visual Studio", BuildType::Release);
        let schema = OptionSchema::resolve(&BTreeMap::new(), &platform).unwrap();
        let host = FixedHost::new();
        let ctx = StepContext {
            source_dir: PathBuf::from("qt5"),
            install_dir: PathBuf::from("package"),
            jobs: 1,
            host: &host,
        };
        let err = MsvcStrategy.build_steps(&schema, &platform, &ctx).unwrap_err();
        assert_eq!(
            err,
            PlanError::ExternalToolNotFound {
                tool: "vcvarsall.bat".to_string()
            }
        );
    }

    #[test]
    fn test_path_overlay() {
        let s = steps(&[], &vs("14", BuildType::Release), &FixedHost::new());
        assert_eq!(s[0].env.path_prepend.len(), 3);
        assert!(s[0].env.path_prepend[0].ends_with("qtbase/bin"));
    }
}
