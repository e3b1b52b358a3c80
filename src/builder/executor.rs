//! Step executor with progress reporting.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::plan::{BuildPlan, BuildStep};
use crate::core::PlanError;
use crate::util::fs::{ensure_dir, read_to_string};
use crate::util::process::{find_executable_in, ProcessBuilder};

/// Lines of a failed step's log repeated on the terminal.
const FAILURE_TAIL_LINES: usize = 20;

/// Runs build steps strictly in order, stopping at the first failure.
///
/// With a log directory and without `verbose`, each step's output goes to
/// `<log dir>/<index>-<phase>.log` and a progress bar is shown. Otherwise
/// the output goes to the terminal.
#[derive(Debug, Clone, Default)]
pub struct StepExecutor {
    dry_run: bool,
    verbose: bool,
    log_dir: Option<PathBuf>,
}

impl StepExecutor {
    /// Create a new step executor.
    pub fn new() -> Self {
        StepExecutor::default()
    }

    /// Only log the steps.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stream child output instead of showing a progress bar.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Write step output to files under `dir`.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    fn capture_dir(&self) -> Option<&Path> {
        if self.verbose {
            None
        } else {
            self.log_dir.as_deref()
        }
    }

    /// Execute every step of a plan.
    pub fn execute(&self, plan: &BuildPlan) -> Result<usize> {
        self.execute_steps(plan.steps())
    }

    /// Execute `steps` in order. Returns the number of steps run.
    ///
    /// A missing program fails with [`PlanError::ExternalToolNotFound`], a
    /// non-zero exit with [`PlanError::StepExecutionFailed`] carrying the
    /// step's index in `steps`.
    pub fn execute_steps(&self, steps: &[BuildStep]) -> Result<usize> {
        let start = Instant::now();

        if self.dry_run {
            for (index, step) in steps.iter().enumerate() {
                tracing::info!(
                    "[dry-run] {} {}: {} (in {})",
                    index,
                    step.phase,
                    step.display_command(),
                    step.working_dir.display()
                );
            }
            return Ok(steps.len());
        }

        let pb = if self.capture_dir().is_some() && steps.len() > 1 {
            let pb = ProgressBar::new(steps.len() as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        for (index, step) in steps.iter().enumerate() {
            if let Some(ref pb) = pb {
                pb.set_message(step.phase.to_string());
            }

            let result = self.run_step(index, step);
            if let Err(e) = result {
                if let Some(pb) = pb {
                    pb.abandon_with_message(format!("{} failed", step.phase));
                }
                return Err(e);
            }

            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        eprintln!(
            "    Finished {} step(s) in {:.2}s",
            steps.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(steps.len())
    }

    fn run_step(&self, index: usize, step: &BuildStep) -> Result<()> {
        let child_path = if step.env.touches_path() {
            step.env.child_path()
        } else {
            None
        };

        let program = find_executable_in(&step.command, child_path.as_deref(), &step.working_dir)
            .ok_or_else(|| PlanError::ExternalToolNotFound {
                tool: step.command.clone(),
            })?;

        tracing::info!("{:>12} {}", step.phase, step.display_command());

        let process = ProcessBuilder::new(program)
            .args(&step.argv)
            .envs(step.env.child_vars())
            .cwd(&step.working_dir);

        let code = match self.capture_dir() {
            Some(dir) => {
                ensure_dir(dir)?;
                let log = dir.join(format!("{}-{}.log", index, step.phase));
                let status = process.exec_to_file(&log)?;
                if status.success() {
                    None
                } else {
                    report_failure(&log);
                    Some(status.code())
                }
            }
            None => {
                let status = process.status()?;
                (!status.success()).then(|| status.code())
            }
        };

        match code {
            None => Ok(()),
            Some(code) => Err(PlanError::StepExecutionFailed {
                index,
                phase: step.phase.to_string(),
                command: step.display_command(),
                code,
            }
            .into()),
        }
    }
}

/// Repeat the tail of a failed step's log.
fn report_failure(log: &Path) {
    match read_to_string(log) {
        Ok(contents) => {
            let lines: Vec<&str> = contents.lines().collect();
            let start = lines.len().saturating_sub(FAILURE_TAIL_LINES);
            for line in &lines[start..] {
                tracing::error!("{}", line);
            }
        }
        Err(e) => tracing::warn!("{:#}", e),
    }
    tracing::error!("full output in {}", log.display());
}
