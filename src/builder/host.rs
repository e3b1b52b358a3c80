//! Host capability queries.
//!
//! Strategies ask the host which tools are installed, read toolchain
//! environment variables and size build parallelism. Keeping these behind
//! a trait lets a plan be computed for any host description.

use std::path::PathBuf;

/// Questions a strategy may ask about the build host.
pub trait HostProbe {
    /// Locate an executable on PATH.
    fn find_program(&self, name: &str) -> Option<PathBuf>;

    /// Read an environment variable.
    fn env_var(&self, name: &str) -> Option<String>;

    /// Number of logical CPUs.
    fn cpu_count(&self) -> usize;
}

/// The machine we are running on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostProbe for SystemHost {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn cpu_count(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_host_cpu_count() {
        assert!(SystemHost.cpu_count() >= 1);
    }

    #[test]
    fn test_system_host_missing_program() {
        assert!(SystemHost
            .find_program("qtpack-definitely-not-a-real-tool")
            .is_none());
    }
}
