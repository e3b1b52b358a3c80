//! Implementation of `qtpack sysdeps`.
//!
//! System packages the X11 platform plugin needs on Linux hosts.

use std::path::Path;

use anyhow::Result;

use crate::core::Arch;
use crate::util::process::{find_executable, ProcessBuilder};

const UBUNTU_PACKAGES: &[&str] = &[
    "libgl1-mesa-dev",
    "libxcb1",
    "libxcb1-dev",
    "libx11-xcb1",
    "libx11-xcb-dev",
    "libxcb-keysyms1",
    "libxcb-keysyms1-dev",
    "libxcb-image0",
    "libxcb-image0-dev",
    "libxcb-shm0",
    "libxcb-shm0-dev",
    "libxcb-icccm4",
    "libxcb-icccm4-dev",
    "libxcb-sync1",
    "libxcb-sync-dev",
    "libxcb-xfixes0-dev",
    "libxrender-dev",
    "libxcb-shape0-dev",
    "libxcb-randr0-dev",
    "libxcb-render-util0",
    "libxcb-render-util0-dev",
    "libxcb-glx0-dev",
    "libxcb-xinerama0",
    "libxcb-xinerama0-dev",
];

const DEBIAN_PACKAGES: &[&str] = &["libx11-dev", "libxext-dev", "libglu-dev"];

/// Packages to install for `distro` when targeting `arch`.
///
/// Unknown distributions need nothing.
pub fn system_packages(distro: &str, arch: Arch) -> Vec<String> {
    match distro {
        "ubuntu" => UBUNTU_PACKAGES
            .iter()
            .map(|p| {
                if arch == Arch::X86 {
                    format!("{}:i386", p)
                } else {
                    p.to_string()
                }
            })
            .collect(),
        "debian" => DEBIAN_PACKAGES.iter().map(|p| p.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// Read the distribution id (`ID=`) from an os-release file.
pub fn detect_distro(os_release: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(os_release).ok()?;
    parse_os_release_id(&contents)
}

fn parse_os_release_id(contents: &str) -> Option<String> {
    contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("ID="))
        .map(|id| id.trim_matches(|c| c == '"' || c == '\'').to_ascii_lowercase())
        .find(|id| !id.is_empty())
}

/// Installs system packages.
pub trait PackageInstaller {
    /// Refresh the package database.
    fn update(&self) -> Result<()>;

    /// Install `packages`.
    fn install(&self, packages: &[String]) -> Result<()>;
}

/// `apt-get` based installer, run through `sudo` when not root.
#[derive(Debug, Clone, Default)]
pub struct AptInstaller {
    sudo: bool,
}

impl AptInstaller {
    pub fn new(sudo: bool) -> Self {
        AptInstaller { sudo }
    }

    fn command(&self) -> Result<ProcessBuilder> {
        let apt = find_executable("apt-get").ok_or_else(|| {
            crate::core::PlanError::ExternalToolNotFound {
                tool: "apt-get".to_string(),
            }
        })?;

        if self.sudo {
            let sudo = find_executable("sudo").ok_or_else(|| {
                crate::core::PlanError::ExternalToolNotFound {
                    tool: "sudo".to_string(),
                }
            })?;
            Ok(ProcessBuilder::new(sudo).arg(apt))
        } else {
            Ok(ProcessBuilder::new(apt))
        }
    }

    fn run(&self, process: ProcessBuilder) -> Result<()> {
        tracing::info!("{}", process.display_command());
        process.status_and_check()
    }
}

impl PackageInstaller for AptInstaller {
    fn update(&self) -> Result<()> {
        self.run(self.command()?.arg("update"))
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        self.run(
            self.command()?
                .args(["install", "-y", "--no-install-recommends"])
                .args(packages),
        )
    }
}

/// Install the packages for `distro`, updating the database first.
///
/// Returns the packages installed; nothing runs when the list is empty.
pub fn install_system_packages(
    installer: &dyn PackageInstaller,
    distro: &str,
    arch: Arch,
) -> Result<Vec<String>> {
    let packages = system_packages(distro, arch);
    if packages.is_empty() {
        tracing::info!("no system packages needed for `{}`", distro);
        return Ok(packages);
    }

    installer.update()?;
    installer.install(&packages)?;
    Ok(packages)
}
