//! `qtpack sysdeps` command

use std::path::Path;

use anyhow::Result;

use crate::cli::SysdepsArgs;
use qtpack::ops::{detect_distro, install_system_packages, system_packages, AptInstaller};

const OS_RELEASE: &str = "/etc/os-release";

pub fn execute(args: SysdepsArgs) -> Result<()> {
    let arch = super::parse_arch(args.arch.as_deref())?;
    let distro = match args.distro {
        Some(d) => d.to_ascii_lowercase(),
        None => detect_distro(Path::new(OS_RELEASE)).unwrap_or_default(),
    };

    if args.install {
        let installer = AptInstaller::new(!args.no_sudo);
        let installed = install_system_packages(&installer, &distro, arch)?;
        eprintln!("   Installed {} package(s)", installed.len());
    } else {
        for package in system_packages(&distro, arch) {
            println!("{}", package);
        }
    }

    Ok(())
}
