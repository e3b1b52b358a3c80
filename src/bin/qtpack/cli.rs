//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// qtpack - build configuration compiler for Qt 5.9.2 packages
#[derive(Parser)]
#[command(name = "qtpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the build plan as JSON
    Plan(PlanArgs),

    /// Print the package manifest (libraries, include dirs, PATH) as JSON
    Manifest(TargetArgs),

    /// List the modules the checkout needs
    Modules(TargetArgs),

    /// List the options recognized on the target platform
    Options(PlatformArgs),

    /// Fetch the sources and run the build plan
    Build(BuildArgs),

    /// Install the system packages the build needs (Linux)
    Sysdeps(SysdepsArgs),

    /// List the configurations published for a release
    Matrix(MatrixArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Target platform; defaults describe the host.
#[derive(Args, Clone, Debug)]
pub struct PlatformArgs {
    /// Target OS (Windows, Linux, Macos)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (x86, x86_64, armv7, armv8)
    #[arg(long)]
    pub arch: Option<String>,

    /// Compiler family (e.g., "Visual Studio", gcc, apple-clang)
    #[arg(long)]
    pub compiler: Option<String>,

    /// Compiler major version (e.g., 14)
    #[arg(long)]
    pub compiler_version: Option<String>,

    /// Build type
    #[arg(long, default_value = "Release")]
    pub build_type: String,
}

/// Platform plus package options.
#[derive(Args, Clone, Debug)]
pub struct TargetArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Package option (repeatable), e.g. `-o shared=False`
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Directory holding the checkout and default install prefix
    #[arg(long)]
    pub build_root: Option<PathBuf>,

    /// Install prefix
    #[arg(long)]
    pub prefix: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Write the plan to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Show the steps without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Use the existing checkout without fetching
    #[arg(long)]
    pub skip_fetch: bool,
}

#[derive(Args)]
pub struct SysdepsArgs {
    /// Target architecture (defaults to host)
    #[arg(long)]
    pub arch: Option<String>,

    /// Distribution id (defaults to /etc/os-release)
    #[arg(long)]
    pub distro: Option<String>,

    /// Install the packages instead of listing them
    #[arg(long)]
    pub install: bool,

    /// Run apt-get without sudo
    #[arg(long)]
    pub no_sudo: bool,
}

#[derive(Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Print the full plan of each configuration
    #[arg(long)]
    pub plans: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
