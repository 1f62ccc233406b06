//! Sequential install execution.

use crate::config::schema::InstallPolicy;
use crate::error::Result;
use crate::installer::plan::{InstallPlan, InstallSpec};
use crate::shell::{self, CommandOptions};
use std::time::Duration;

/// Progress events emitted while walking the plan.
pub enum InstallProgress<'a> {
    /// An install is about to run.
    Starting {
        spec: &'a InstallSpec,
        index: usize,
        total: usize,
    },
    /// An install finished (either way).
    Finished {
        spec: &'a InstallSpec,
        outcome: &'a InstallOutcome,
    },
}

/// The result of one install attempt.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Package name.
    pub name: String,

    /// Requirement string that was installed.
    pub requirement: String,

    /// Rendered command line, for error blocks.
    pub command: String,

    /// Whether the installer exited zero.
    pub success: bool,

    /// Installer exit code (None if killed by signal or never spawned).
    pub exit_code: Option<i32>,

    /// How long the attempt took.
    pub duration: Duration,

    /// Tail of the installer output, kept for the error block.
    pub output_tail: String,
}

/// The result of executing a whole plan.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Outcome per attempted spec, in plan order.
    pub outcomes: Vec<InstallOutcome>,

    /// Whether fail-fast stopped the sequence before the end.
    pub aborted: bool,
}

impl InstallReport {
    /// Number of attempted installs.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &InstallOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    /// Whether every attempted install succeeded and nothing was skipped.
    pub fn all_succeeded(&self) -> bool {
        !self.aborted && self.outcomes.iter().all(|o| o.success)
    }
}

/// Walks an [`InstallPlan`] strictly sequentially.
///
/// Each attempt is independent: under [`InstallPolicy::BestEffort`] a
/// failure is recorded and the walk continues, matching the observed
/// launcher behavior; under [`InstallPolicy::FailFast`] the walk stops at
/// the first failure and the report is marked aborted.
pub struct InstallExecutor {
    policy: InstallPolicy,
    capture_output: bool,
}

impl InstallExecutor {
    /// Create an executor with the given policy.
    ///
    /// `capture_output` buffers installer output for the report; when
    /// false the installer writes straight to the terminal (verbose mode).
    pub fn new(policy: InstallPolicy, capture_output: bool) -> Self {
        Self {
            policy,
            capture_output,
        }
    }

    /// Execute every spec in the plan, in order.
    ///
    /// Returns only after every spec has been attempted, or after a
    /// failure stopped a fail-fast walk. A spawn error (installer binary
    /// missing) is a failed outcome like any non-zero exit, not an `Err`,
    /// since best-effort has to be able to walk past it.
    pub fn run(
        &self,
        plan: &InstallPlan,
        progress: &mut dyn FnMut(InstallProgress<'_>),
    ) -> Result<InstallReport> {
        let mut report = InstallReport::default();
        let total = plan.len();

        for (index, spec) in plan.specs().iter().enumerate() {
            progress(InstallProgress::Starting { spec, index, total });

            let outcome = self.run_one(spec);
            let failed = !outcome.success;

            tracing::debug!(
                dependency = %spec.name,
                success = outcome.success,
                code = ?outcome.exit_code,
                "install attempt finished"
            );

            progress(InstallProgress::Finished {
                spec,
                outcome: &outcome,
            });
            report.outcomes.push(outcome);

            if failed && self.policy == InstallPolicy::FailFast {
                report.aborted = index + 1 < total;
                break;
            }
        }

        Ok(report)
    }

    fn run_one(&self, spec: &InstallSpec) -> InstallOutcome {
        let options = CommandOptions {
            capture_stdout: self.capture_output,
            capture_stderr: self.capture_output,
            ..Default::default()
        };

        match shell::execute(&spec.program, &spec.args, &options) {
            Ok(result) => InstallOutcome {
                name: spec.name.clone(),
                requirement: spec.requirement.clone(),
                command: spec.render(),
                success: result.success,
                exit_code: result.exit_code,
                duration: result.duration,
                output_tail: tail(&result.stdout, &result.stderr),
            },
            Err(e) => InstallOutcome {
                name: spec.name.clone(),
                requirement: spec.requirement.clone(),
                command: spec.render(),
                success: false,
                exit_code: None,
                duration: Duration::ZERO,
                output_tail: e.to_string(),
            },
        }
    }
}

/// Keep the last lines of combined output for the error block.
fn tail(stdout: &str, stderr: &str) -> String {
    const MAX_LINES: usize = 20;

    let lines: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|l| !l.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(MAX_LINES);
    lines[start..].join("\n")
}
