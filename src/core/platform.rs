//! Target platform description.
//!
//! A [`PlatformDescriptor`] identifies the OS, architecture, compiler and
//! build type of one compilation target. It is supplied by the caller and
//! never modified.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::PlanError;

/// Operating system family.
///
/// Unrecognized names parse into [`Os::Other`] so that the descriptor can
/// still be built; strategy selection rejects them later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Os {
    Windows,
    Linux,
    Macos,
    Other(String),
}

impl Os {
    /// Get the host OS.
    pub fn host() -> Self {
        Os::from(std::env::consts::OS.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::Other(name) => name,
        }
    }

    pub fn is_windows(&self) -> bool {
        *self == Os::Windows
    }

    /// Conventional compiler family for this OS.
    pub fn default_compiler(&self) -> &'static str {
        match self {
            Os::Windows => "Visual Studio",
            Os::Macos => "apple-clang",
            _ => "gcc",
        }
    }
}

impl From<String> for Os {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" => Os::Windows,
            "linux" => Os::Linux,
            "macos" | "darwin" | "osx" => Os::Macos,
            _ => Os::Other(s),
        }
    }
}

impl From<Os> for String {
    fn from(os: Os) -> Self {
        os.as_str().to_string()
    }
}

impl FromStr for Os {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Os::from(s.to_string()))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    /// Get the host architecture, if it is one we know.
    pub fn host() -> Option<Self> {
        std::env::consts::ARCH.parse().ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }

    /// Argument understood by `vcvarsall.bat`.
    pub fn vcvars_arch(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "amd64",
            Arch::Armv7 => "x86_arm",
            Arch::Armv8 => "x86_arm64",
        }
    }
}

impl FromStr for Arch {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" => Ok(Arch::X86),
            "x64" | "x86_64" | "amd64" => Ok(Arch::X86_64),
            "armv7" | "arm" => Ok(Arch::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Arch::Armv8),
            _ => Err(PlanError::UnsupportedPlatform {
                reason: format!("unknown architecture `{}`", s),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
        }
    }

    /// Configure flag selecting this build type.
    pub fn as_flag(&self) -> &'static str {
        match self {
            BuildType::Debug => "-debug",
            BuildType::Release => "-release",
        }
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            _ => Err(format!(
                "invalid build type '{}'; expected 'Debug' or 'Release'",
                s
            )),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one compilation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    pub os: Os,
    pub arch: Arch,
    /// Compiler family name (e.g., "Visual Studio", "gcc", "apple-clang")
    pub compiler: String,
    /// Major compiler version, when known
    pub compiler_version: Option<String>,
    pub build_type: BuildType,
}

impl PlatformDescriptor {
    /// Create a new descriptor.
    pub fn new(os: Os, arch: Arch, compiler: impl Into<String>, build_type: BuildType) -> Self {
        PlatformDescriptor {
            os,
            arch,
            compiler: compiler.into(),
            compiler_version: None,
            build_type,
        }
    }

    /// Set the compiler version.
    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = Some(version.into());
        self
    }

    /// Describe the host with its conventional compiler.
    pub fn host(build_type: BuildType) -> Result<Self, PlanError> {
        let os = Os::host();
        let arch = Arch::host().ok_or_else(|| PlanError::UnsupportedPlatform {
            reason: format!("unknown host architecture `{}`", std::env::consts::ARCH),
        })?;
        let compiler = os.default_compiler();
        Ok(PlatformDescriptor::new(os, arch, compiler, build_type))
    }

    /// Whether the compiler belongs to the Visual Studio family.
    pub fn is_msvc(&self) -> bool {
        matches!(
            self.compiler.to_ascii_lowercase().as_str(),
            "visual studio" | "msvc" | "cl"
        )
    }

    pub fn is_debug(&self) -> bool {
        self.build_type == BuildType::Debug
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.os, self.arch, self.compiler)?;
        if let Some(ref v) = self.compiler_version {
            write!(f, " {}", v)?;
        }
        write!(f, " ({})", self.build_type)
    }
}
