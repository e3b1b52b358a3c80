//! Implementation of `qtpack matrix`.
//!
//! The set of configurations a release is published for.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::options::SHARED_OPTION;
use crate::core::{Arch, BuildType, Os, PlatformDescriptor};

/// One published configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    pub platform: PlatformDescriptor,
    /// Raw option overrides for this configuration
    pub options: BTreeMap<String, String>,
}

/// Configurations built for a release on `os` with `compiler`.
///
/// Covers arch x build type x linkage, plus one default build with
/// XML Patterns enabled. Debug builds are not published for macOS.
pub fn common_builds(
    os: &Os,
    compiler: &str,
    compiler_version: Option<&str>,
    host_arch: Arch,
) -> Vec<BuildConfiguration> {
    let platform = |arch, build_type| {
        let p = PlatformDescriptor::new(os.clone(), arch, compiler, build_type);
        match compiler_version {
            Some(v) => p.with_compiler_version(v),
            None => p,
        }
    };

    let mut builds = Vec::new();
    for arch in [Arch::X86, Arch::X86_64] {
        for build_type in [BuildType::Release, BuildType::Debug] {
            for shared in ["True", "False"] {
                builds.push(BuildConfiguration {
                    platform: platform(arch, build_type),
                    options: BTreeMap::from([(SHARED_OPTION.to_string(), shared.to_string())]),
                });
            }
        }
    }

    builds.push(BuildConfiguration {
        platform: platform(host_arch, BuildType::Release),
        options: BTreeMap::from([("xmlpatterns".to_string(), "True".to_string())]),
    });

    if *os == Os::Macos {
        builds.retain(|b| !b.platform.is_debug());
    }

    tracing::debug!("{} configurations for {}", builds.len(), os);
    builds
}
