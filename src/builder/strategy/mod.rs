//! Per-toolchain build strategies.
//!
//! Each strategy turns a resolved option set into the ordered configure,
//! build and install steps for one toolchain family. Strategy selection is
//! a closed set of non-overlapping predicates over the platform: every
//! supported descriptor matches exactly one, anything else is rejected.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::host::HostProbe;
use crate::builder::plan::BuildStep;
use crate::core::{Os, OptionSchema, PlanError, PlatformDescriptor};

mod mingw;
mod msvc;
mod unix;

pub use mingw::MingwStrategy;
pub use msvc::{msvc_mkspec, MsvcStrategy, SslLinkage};
pub use unix::UnixStrategy;

/// Inputs shared by every strategy.
pub struct StepContext<'a> {
    /// Source checkout; working directory of every step
    pub source_dir: PathBuf,
    /// Install prefix passed to configure
    pub install_dir: PathBuf,
    /// Parallelism for the build tool
    pub jobs: usize,
    pub host: &'a dyn HostProbe,
}

/// Trait for strategy implementations.
pub trait BuildStrategy {
    /// The variant this strategy implements.
    fn kind(&self) -> StrategyKind;

    /// Generate the ordered build steps.
    fn build_steps(
        &self,
        schema: &OptionSchema,
        platform: &PlatformDescriptor,
        ctx: &StepContext<'_>,
    ) -> Result<Vec<BuildStep>, PlanError>;
}

/// The toolchain family a strategy targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Windows with a Visual Studio compiler
    Msvc,
    /// Windows with any other compiler
    Mingw,
    /// Linux and macOS
    Unix,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [StrategyKind::Msvc, StrategyKind::Mingw, StrategyKind::Unix];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Msvc => "msvc",
            StrategyKind::Mingw => "mingw",
            StrategyKind::Unix => "unix",
        }
    }

    /// Whether this variant handles `platform`.
    pub fn matches(&self, platform: &PlatformDescriptor) -> bool {
        match self {
            StrategyKind::Msvc => platform.os == Os::Windows && platform.is_msvc(),
            StrategyKind::Mingw => platform.os == Os::Windows && !platform.is_msvc(),
            StrategyKind::Unix => matches!(platform.os, Os::Linux | Os::Macos),
        }
    }

    /// Pick the single variant matching `platform`.
    pub fn select(platform: &PlatformDescriptor) -> Result<Self, PlanError> {
        let matching: Vec<StrategyKind> = Self::ALL
            .into_iter()
            .filter(|kind| kind.matches(platform))
            .collect();

        match matching.as_slice() {
            [kind] => Ok(*kind),
            [] => Err(PlanError::UnsupportedPlatform {
                reason: format!(
                    "no build strategy for OS `{}` with compiler `{}`",
                    platform.os, platform.compiler
                ),
            }),
            many => Err(PlanError::UnsupportedPlatform {
                reason: format!(
                    "ambiguous build strategy for {}: {}",
                    platform,
                    many.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
                ),
            }),
        }
    }

    /// The implementation for this variant.
    pub fn strategy(&self) -> &'static dyn BuildStrategy {
        match self {
            StrategyKind::Msvc => &MsvcStrategy,
            StrategyKind::Mingw => &MingwStrategy,
            StrategyKind::Unix => &UnixStrategy,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configure arguments shared by every strategy.
///
/// Linkage goes first, build type last.
pub fn common_configure_args(
    schema: &OptionSchema,
    platform: &PlatformDescriptor,
    install_dir: &Path,
) -> Result<Vec<String>, PlanError> {
    let mut args = Vec::new();

    if !schema.is_shared()? {
        args.push("-static".to_string());
    }

    args.extend(
        [
            "-opensource",
            "-confirm-license",
            "-nomake",
            "examples",
            "-nomake",
            "tests",
            "-qt-zlib",
            "-prefix",
        ]
        .map(String::from),
    );
    args.push(install_dir.display().to_string());
    args.push(platform.build_type.as_flag().to_string());

    Ok(args)
}

/// Join a Windows-style relative path onto the source dir.
fn source_subdir(source_dir: &Path, rel: &str) -> PathBuf {
    rel.split('/').fold(source_dir.to_path_buf(), |p, c| p.join(c))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::core::{Arch, BuildType};

    fn all_descriptors() -> Vec<PlatformDescriptor> {
        let mut out = Vec::new();
        for os in [Os::Windows, Os::Linux, Os::Macos] {
            for compiler in ["Visual Studio", "MSVC", "gcc", "clang", "apple-clang"] {
                for arch in [Arch::X86, Arch::X86_64, Arch::Armv8] {
                    for bt in [BuildType::Debug, BuildType::Release] {
                        out.push(PlatformDescriptor::new(os.clone(), arch, compiler, bt));
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_exactly_one_variant_matches() {
        for platform in all_descriptors() {
            let count = StrategyKind::ALL
                .iter()
                .filter(|k| k.matches(&platform))
                .count();
            assert_eq!(count, 1, "{}", platform);
            assert!(StrategyKind::select(&platform).is_ok());
        }
    }

    #[test]
    fn test_select() {
        let p = |os: Os, compiler: &str| {
            PlatformDescriptor::new(os, Arch::X86_64, compiler, BuildType::Release)
        };
        assert_eq!(
            StrategyKind::select(&p(Os::Windows, "Visual Studio")).unwrap(),
            StrategyKind::Msvc
        );
        assert_eq!(
            StrategyKind::select(&p(Os::Windows, "gcc")).unwrap(),
            StrategyKind::Mingw
        );
        assert_eq!(
            StrategyKind::select(&p(Os::Macos, "apple-clang")).unwrap(),
            StrategyKind::Unix
        );
    }

    #[test]
    fn test_unknown_os_rejected() {
        let platform = PlatformDescriptor::new(
            Os::Other("Solaris".to_string()),
            Arch::X86_64,
            "gcc",
            BuildType::Release,
        );
        let err = StrategyKind::select(&platform).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedPlatform { ref reason } if reason.contains("Solaris")));
    }

    #[test]
    fn test_strategy_kind_roundtrip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.strategy().kind(), kind);
        }
    }

    #[test]
    fn test_common_args_static_first_build_type_last() {
        let platform = PlatformDescriptor::new(Os::Linux, Arch::X86_64, "gcc", BuildType::Debug);
        let raw = BTreeMap::from([("shared".to_string(), "False".to_string())]);
        let schema = OptionSchema::resolve(&raw, &platform).unwrap();

        let args = common_configure_args(&schema, &platform, Path::new("/pkg")).unwrap();
        assert_eq!(args.first().unwrap(), "-static");
        assert_eq!(args.last().unwrap(), "-debug");
        assert!(args.contains(&"/pkg".to_string()));
    }

    #[test]
    fn test_common_args_shared_has_no_static() {
        let platform = PlatformDescriptor::new(Os::Linux, Arch::X86_64, "gcc", BuildType::Release);
        let schema = OptionSchema::resolve(&BTreeMap::new(), &platform).unwrap();

        let args = common_configure_args(&schema, &platform, Path::new("/pkg")).unwrap();
        assert!(!args.contains(&"-static".to_string()));
        assert_eq!(args.first().unwrap(), "-opensource");
        assert_eq!(args.last().unwrap(), "-release");
    }
}
