//! Test utilities for qtpack.
//!
//! Provides a host description with fixed answers and shorthand
//! constructors for the platforms and option maps tests use most.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::builder::host::HostProbe;
use crate::core::{Arch, BuildType, ModuleRequirement, OptionSchema, Os, PlatformDescriptor};

/// A build host whose answers are fixed up front.
///
/// No programs are installed and no variables are set until added.
#[derive(Debug, Clone)]
pub struct FixedHost {
    programs: HashMap<String, PathBuf>,
    env: HashMap<String, String>,
    cpus: usize,
}

impl FixedHost {
    pub fn new() -> Self {
        FixedHost {
            programs: HashMap::new(),
            env: HashMap::new(),
            cpus: 2,
        }
    }

    /// Mark a program as installed at `path`.
    pub fn with_program(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(name.to_string(), path.into());
        self
    }

    /// Set an environment variable.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_cpus(mut self, cpus: usize) -> Self {
        self.cpus = cpus;
        self
    }
}

impl Default for FixedHost {
    fn default() -> Self {
        FixedHost::new()
    }
}

impl HostProbe for FixedHost {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        self.programs.get(name).cloned()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn cpu_count(&self) -> usize {
        self.cpus
    }
}

/// Linux x86_64 with gcc.
pub fn linux_x64(build_type: BuildType) -> PlatformDescriptor {
    PlatformDescriptor::new(Os::Linux, Arch::X86_64, "gcc", build_type)
}

/// Windows x86_64 with the given Visual Studio major version.
pub fn windows_msvc(version: &str, build_type: BuildType) -> PlatformDescriptor {
    PlatformDescriptor::new(Os::Windows, Arch::X86_64, "Visual Studio", build_type)
        .with_compiler_version(version)
}

/// Build a raw option map from string pairs.
pub fn raw_options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Modules selected on Linux x86_64 for the given options.
pub fn linux_modules(pairs: &[(&str, &str)]) -> ModuleRequirement {
    let platform = linux_x64(BuildType::Release);
    let schema = OptionSchema::resolve(&raw_options(pairs), &platform).unwrap();
    ModuleRequirement::select(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_host() {
        let host = FixedHost::new()
            .with_program("jom", "/tools/jom")
            .with_env("VS140COMNTOOLS", "C:\\VS")
            .with_cpus(6);

        assert_eq!(host.find_program("jom"), Some(PathBuf::from("/tools/jom")));
        assert!(host.find_program("nmake").is_none());
        assert_eq!(host.env_var("VS140COMNTOOLS").as_deref(), Some("C:\\VS"));
        assert_eq!(host.cpu_count(), 6);
    }
}
