//! Planning error types.

use thiserror::Error;

use crate::util::process::describe_exit;

/// Error raised while resolving options, selecting a strategy, or running
/// a plan.
///
/// Every variant names the option, platform predicate, tool, or step that
/// caused it. None of these are retryable: they indicate bad caller input
/// or a broken host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("unknown option `{name}`")]
    UnknownOption { name: String },

    #[error("invalid value `{value}` for option `{name}` (expected one of: {})", allowed.join(", "))]
    InvalidOptionValue {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("option `{name}` is not available when targeting {os}")]
    OptionUnavailable { name: String, os: String },

    #[error("unsupported platform: {reason}")]
    UnsupportedPlatform { reason: String },

    #[error("required build tool `{tool}` not found")]
    ExternalToolNotFound { tool: String },

    #[error("step {index} ({phase}) failed with {}: `{command}`", describe_exit(*code))]
    StepExecutionFailed {
        index: usize,
        phase: String,
        command: String,
        code: Option<i32>,
    },
}

impl PlanError {
    /// A short hint for the user, if one applies.
    pub fn help(&self) -> Option<String> {
        match self {
            PlanError::UnknownOption { .. } | PlanError::InvalidOptionValue { .. } => {
                Some("help: Run `qtpack options` to list recognized options".to_string())
            }
            PlanError::OptionUnavailable { name, .. } => Some(format!(
                "help: Remove `-o {}=...` for this platform",
                name
            )),
            PlanError::ExternalToolNotFound { tool } => {
                Some(format!("help: Install `{}` and ensure it's in your PATH", tool))
            }
            PlanError::UnsupportedPlatform { .. } | PlanError::StepExecutionFailed { .. } => None,
        }
    }
}
