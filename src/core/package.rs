//! Package identity.

use semver::Version;
use serde::Serialize;

/// Package name as published.
pub const PACKAGE_NAME: &str = "Qt";

/// Upstream version being packaged.
pub const PACKAGE_VERSION: Version = Version::new(5, 9, 2);

/// Upstream super-repository.
pub const SOURCE_REPOSITORY: &str = "http://code.qt.io/qt/qt5.git";

/// Checkout directory under the build root.
pub const SOURCE_DIR: &str = "qt5";

/// Identity of the package being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: Version,
    pub repository: String,
}

impl PackageInfo {
    /// The package this crate knows how to build.
    pub fn qt() -> Self {
        PackageInfo {
            name: PACKAGE_NAME.to_string(),
            version: PACKAGE_VERSION,
            repository: SOURCE_REPOSITORY.to_string(),
        }
    }

    /// Branch that carries `init-repository` for this release line.
    pub fn branch(&self) -> String {
        format!("{}.{}", self.version.major, self.version.minor)
    }

    /// Release tag.
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }

    /// Qt library name prefix (e.g., "Qt5").
    pub fn lib_prefix(&self) -> String {
        format!("{}{}", self.name, self.version.major)
    }
}
