//! Package manifest for downstream consumers.
//!
//! The manifest lists library names, include directories and PATH
//! additions for a package built with a given option set. It is derived
//! from the resolved options and platform alone, so it can be produced
//! whether or not a build ran.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::options::OptionSchema;
use crate::core::package::PackageInfo;
use crate::core::platform::{Os, PlatformDescriptor};

/// Libraries shipped by every build, in link order.
pub const BASE_LIBRARIES: &[&str] = &[
    "Concurrent",
    "Core",
    "DBus",
    "Gui",
    "Network",
    "OpenGL",
    "Sql",
    "Test",
    "Widgets",
    "Xml",
];

/// Library added when the X11 extras module is built.
pub const X11_LIBRARY: &str = "X11Extras";

const X11_OPTION: &str = "x11extras";

/// Include root inside the package folder.
pub const INCLUDE_ROOT: &str = "include";

/// Runtime binaries directory inside the package folder.
pub const BIN_DIR: &str = "bin";

/// Libraries, include dirs and environment changes exposed by a package.
///
/// Paths are relative to the package folder; see [`PackageManifest::rooted`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub libraries: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub env_path_additions: Vec<PathBuf>,
}

impl PackageManifest {
    /// Derive the manifest for `schema` on `platform`.
    pub fn build(schema: &OptionSchema, platform: &PlatformDescriptor) -> Self {
        let pkg = PackageInfo::qt();

        let mut modules: Vec<&str> = BASE_LIBRARIES.to_vec();
        // Only present (not pruned) and enabled.
        if schema.get_bool(X11_OPTION).unwrap_or(false) {
            modules.push(X11_LIBRARY);
        }

        let suffix = library_suffix(platform);
        let prefix = pkg.lib_prefix();

        let libraries = modules
            .iter()
            .map(|m| format!("{}{}{}", prefix, m, suffix))
            .collect();

        let mut include_dirs = vec![PathBuf::from(INCLUDE_ROOT)];
        include_dirs.extend(
            modules
                .iter()
                .map(|m| Path::new(INCLUDE_ROOT).join(format!("{}{}", pkg.name, m))),
        );

        let env_path_additions = if platform.os.is_windows() {
            vec![PathBuf::from(BIN_DIR)]
        } else {
            Vec::new()
        };

        PackageManifest {
            libraries,
            include_dirs,
            env_path_additions,
        }
    }

    /// Resolve every path against the package folder.
    pub fn rooted(&self, package_dir: &Path) -> Self {
        PackageManifest {
            libraries: self.libraries.clone(),
            include_dirs: self.include_dirs.iter().map(|d| package_dir.join(d)).collect(),
            env_path_additions: self
                .env_path_additions
                .iter()
                .map(|d| package_dir.join(d))
                .collect(),
        }
    }
}

/// Binary-name suffix for debug builds.
pub fn library_suffix(platform: &PlatformDescriptor) -> &'static str {
    match (&platform.os, platform.is_debug()) {
        (Os::Windows, true) => "d",
        (Os::Macos, true) => "_debug",
        _ => "",
    }
}
