//! Run command implementation.
//!
//! `basecamp run` (or a bare `basecamp`) executes the whole bootstrap
//! sequence: runtime gate, sequential installs, application launch, pause.
//! The sequence is strictly linear; the only branches are the explicit
//! skip flags and the install failure policy.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::{
    find_manifest, resolve_manifest, validate_manifest, InstallPolicy, Manifest,
};
use crate::error::{BasecampError, Result};
use crate::installer::{InstallExecutor, InstallPlan, InstallProgress, InstallReport};
use crate::launcher;
use crate::runtime::{RuntimeInfo, RuntimeProbe};
use crate::ui::{format_duration, OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult};

const PAUSE_PROMPT: &str = "Press Enter to close...";

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    manifest_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, manifest_path: Option<PathBuf>, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest_path,
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    fn effective_policy(&self, manifest: &Manifest) -> InstallPolicy {
        if self.args.fail_fast {
            InstallPolicy::FailFast
        } else {
            manifest.install.policy
        }
    }

    /// Pause before exiting, on success and failure alike, so the last
    /// lines of output survive a terminal window that closes on exit.
    fn pause(&self, manifest: &Manifest, ui: &mut dyn UserInterface) {
        if manifest.pause && !self.args.no_pause && !self.args.dry_run {
            ui.pause(PAUSE_PROMPT);
        }
    }

    fn check_runtime(&self, manifest: &Manifest, ui: &mut dyn UserInterface) -> Result<RuntimeInfo> {
        let mut spinner = ui.start_spinner(&format!(
            "Checking for {}...",
            manifest.runtime.candidates.join(" / ")
        ));

        match RuntimeProbe::new(&manifest.runtime).detect() {
            Ok(info) => {
                spinner.finish_success(&format!(
                    "{} ({})",
                    info.raw_version,
                    info.binary.display()
                ));
                Ok(info)
            }
            Err(e) => {
                spinner.finish_error("Runtime check failed");
                Err(e)
            }
        }
    }

    fn install(
        &self,
        plan: &InstallPlan,
        policy: InstallPolicy,
        ui: &mut dyn UserInterface,
    ) -> Result<InstallReport> {
        // Verbose mode streams installer output straight to the terminal;
        // a spinner would just fight with it.
        let capture = !ui.output_mode().shows_command_output();
        let executor = InstallExecutor::new(policy, capture);

        let mut spinner = None;
        executor.run(plan, &mut |event| match event {
            InstallProgress::Starting { spec, index, total } => {
                ui.show_progress(index + 1, total);
                if capture {
                    spinner = Some(ui.start_spinner(&format!("Installing {}...", spec.requirement)));
                } else {
                    ui.message(&format!("  Installing {}...", spec.requirement));
                }
            }
            InstallProgress::Finished { spec, outcome } => {
                if let Some(mut s) = spinner.take() {
                    if outcome.success {
                        s.finish_success(&format!(
                            "{} ({})",
                            spec.requirement,
                            format_duration(outcome.duration)
                        ));
                    } else {
                        s.finish_error(&format!(
                            "{} failed (exit code {})",
                            spec.requirement,
                            outcome
                                .exit_code
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "none".to_string())
                        ));
                    }
                } else if !outcome.success {
                    ui.error(&format!("  {} failed", spec.requirement));
                }
            }
        })
    }

    fn report_install_failures(&self, report: &InstallReport, ui: &mut dyn UserInterface) {
        for failure in report.failures() {
            ui.show_error_block(
                &failure.command,
                &failure.output_tail,
                Some("The application may still start if the package was already installed"),
            );
        }
    }

    fn launch(&self, manifest: &Manifest, runtime: &RuntimeInfo, ui: &mut dyn UserInterface) {
        ui.message(&format!("Launching {}...", manifest.display_name()));

        let outcome = launcher::launch(&runtime.binary, &manifest.launch, &self.project_root);

        // Everything past the spawn is the application's business: report,
        // never classify, never let it change our exit code.
        match (&outcome.error, outcome.exit_code) {
            (Some(e), _) => {
                ui.warning(&format!(
                    "Application failed to start: {} ({})",
                    e, outcome.command
                ));
            }
            (None, Some(0)) => {
                ui.success(&format!(
                    "{} exited normally ({})",
                    manifest.display_name(),
                    format_duration(outcome.duration)
                ));
            }
            (None, Some(code)) => {
                ui.warning(&format!(
                    "{} exited with code {} ({})",
                    manifest.display_name(),
                    code,
                    format_duration(outcome.duration)
                ));
            }
            (None, None) => {
                ui.warning(&format!(
                    "{} was terminated by a signal",
                    manifest.display_name()
                ));
            }
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // Load and validate the manifest
        let manifest = match resolve_manifest(&self.project_root, self.manifest_path.as_deref()) {
            Ok(m) => m,
            Err(e @ BasecampError::ManifestNotFound { .. })
            | Err(e @ BasecampError::ManifestParseError { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };
        if let Err(e) = validate_manifest(&manifest) {
            ui.error(&e.to_string());
            return Ok(CommandResult::failure(2));
        }

        ui.show_header(&format!("Preparing {}", manifest.display_name()));

        if self.args.dry_run || ui.output_mode() == OutputMode::Verbose {
            match (&self.manifest_path, find_manifest(&self.project_root)) {
                (Some(explicit), _) => ui.message(&format!("Manifest: {}", explicit.display())),
                (None, Some(found)) => ui.message(&format!("Manifest: {}", found.display())),
                (None, None) => ui.message("Manifest: built-in defaults"),
            }
        }

        if self.args.dry_run {
            ui.message("Running in dry-run mode - no commands will be executed");
        }

        // Hard gate: no install and no launch without a runtime
        let runtime = match self.check_runtime(&manifest, ui) {
            Ok(info) => info,
            Err(e) => {
                ui.error(&e.to_string());
                self.pause(&manifest, ui);
                return Ok(CommandResult::failure(1));
            }
        };

        let plan = InstallPlan::build(&manifest, &runtime.binary.to_string_lossy(), self.args.index_url.as_deref());
        let policy = self.effective_policy(&manifest);

        // Install sequence
        if self.args.skip_install {
            ui.warning("Skipping dependency installation (--skip-install)");
        } else if self.args.dry_run {
            for spec in plan.specs() {
                ui.message(&format!("  would run: {}", spec.render()));
            }
        } else if !plan.is_empty() {
            let report = self.install(&plan, policy, ui)?;
            self.report_install_failures(&report, ui);

            let failed = report.failures().count();
            if failed > 0 {
                match policy {
                    InstallPolicy::FailFast => {
                        ui.error(&format!(
                            "Stopping: {} of {} installs failed (fail-fast)",
                            failed,
                            plan.len()
                        ));
                        self.pause(&manifest, ui);
                        return Ok(CommandResult::failure(1));
                    }
                    InstallPolicy::BestEffort => {
                        ui.warning(&format!(
                            "{} of {} installs failed; continuing anyway (best-effort)",
                            failed,
                            plan.len()
                        ));
                    }
                }
            }
        }

        // Launch
        if self.args.no_launch {
            ui.success("Environment ready (launch skipped)");
        } else if self.args.dry_run {
            ui.message(&format!(
                "  would launch: {} {}",
                runtime.binary.display(),
                manifest.launch.entry_point.display()
            ));
            ui.success("Dry-run complete - no commands were executed");
        } else {
            self.launch(&manifest, &runtime, ui);
        }

        self.pause(&manifest, ui);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_stub(path: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn setup_project(config_content: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".basecamp");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config_content).unwrap();
        temp
    }

    #[test]
    fn run_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = RunCommand::new(temp.path(), None, RunArgs::default());
        assert_eq!(cmd.project_root(), temp.path());
        assert!(!cmd.args().dry_run);
    }

    #[test]
    fn effective_policy_flag_overrides_manifest() {
        let temp = TempDir::new().unwrap();
        let manifest = Manifest::builtin();

        let cmd = RunCommand::new(
            temp.path(),
            None,
            RunArgs {
                fail_fast: true,
                ..Default::default()
            },
        );
        assert_eq!(cmd.effective_policy(&manifest), InstallPolicy::FailFast);

        let cmd = RunCommand::new(temp.path(), None, RunArgs::default());
        assert_eq!(cmd.effective_policy(&manifest), InstallPolicy::BestEffort);
    }

    #[test]
    fn execute_with_invalid_manifest_exits_2() {
        let temp = setup_project("runtime:\n  candidates: []\n");
        let cmd = RunCommand::new(temp.path(), None, RunArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("runtime.candidates"));
    }

    #[test]
    fn execute_with_missing_runtime_exits_1_without_installs() {
        let temp = setup_project(
            "runtime:\n  candidates: [definitely-missing-runtime-xyz]\ndependencies: [numpy]\n",
        );
        let cmd = RunCommand::new(temp.path(), None, RunArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        // Error message carries the remediation URL
        assert!(ui.has_error("python.org"));
        // No install progress was ever shown
        assert!(ui.progress().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn execute_dry_run_probes_but_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let runtime = temp.path().join("fake-python");
        write_stub(&runtime, "echo Python 3.11.4");

        let config = format!(
            "runtime:\n  candidates: [{}]\ndependencies: [numpy]\n",
            runtime.display()
        );
        let temp_project = setup_project(&config);
        let cmd = RunCommand::new(
            temp_project.path(),
            None,
            RunArgs {
                dry_run: true,
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("would run:"));
        assert!(ui.has_message("would launch:"));
        assert!(!ui.paused());
    }

    #[test]
    #[cfg(unix)]
    fn execute_best_effort_launches_despite_install_failure() {
        let temp = TempDir::new().unwrap();
        let runtime = temp.path().join("fake-python");
        let installer = temp.path().join("fake-pip");
        // Runtime stub also serves as the app: with a script arg it exits 0
        write_stub(&runtime, "echo Python 3.11.4");
        write_stub(&installer, "exit 1");
        fs::write(temp.path().join("app.py"), "").unwrap();

        let config = format!(
            concat!(
                "runtime:\n  candidates: [{}]\n",
                "install:\n  program: [{}, install]\n  index_url: null\n",
                "dependencies: [numpy]\n",
                "launch:\n  entry_point: app.py\n",
            ),
            runtime.display(),
            installer.display()
        );
        let project = setup_project(&config);
        let cmd = RunCommand::new(project.path(), None, RunArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        // Install failed but the sequence fell through to launch and exit 0
        assert!(result.success);
        assert!(ui.has_warning("best-effort"));
        assert!(ui.has_message("Launching"));
    }

    #[test]
    #[cfg(unix)]
    fn execute_fail_fast_stops_before_launch() {
        let temp = TempDir::new().unwrap();
        let runtime = temp.path().join("fake-python");
        let installer = temp.path().join("fake-pip");
        write_stub(&runtime, "echo Python 3.11.4");
        write_stub(&installer, "exit 1");

        let config = format!(
            concat!(
                "runtime:\n  candidates: [{}]\n",
                "install:\n  program: [{}, install]\n  index_url: null\n  policy: fail-fast\n",
                "dependencies: [numpy, Pillow]\n",
            ),
            runtime.display(),
            installer.display()
        );
        let project = setup_project(&config);
        let cmd = RunCommand::new(project.path(), None, RunArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("fail-fast"));
        assert!(!ui.has_message("Launching"));
    }

    #[test]
    #[cfg(unix)]
    fn execute_no_launch_reports_environment_ready() {
        let temp = TempDir::new().unwrap();
        let runtime = temp.path().join("fake-python");
        let installer = temp.path().join("fake-pip");
        write_stub(&runtime, "echo Python 3.11.4");
        write_stub(&installer, "exit 0");

        let config = format!(
            concat!(
                "runtime:\n  candidates: [{}]\n",
                "install:\n  program: [{}, install]\n  index_url: null\n",
                "dependencies: [numpy]\n",
            ),
            runtime.display(),
            installer.display()
        );
        let project = setup_project(&config);
        let cmd = RunCommand::new(
            project.path(),
            None,
            RunArgs {
                no_launch: true,
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("launch skipped"));
    }

    #[test]
    #[cfg(unix)]
    fn install_progress_is_sequential_and_complete() {
        let temp = TempDir::new().unwrap();
        let runtime = temp.path().join("fake-python");
        let installer = temp.path().join("fake-pip");
        write_stub(&runtime, "echo Python 3.11.4");
        write_stub(&installer, "exit 0");
        fs::write(temp.path().join("app.py"), "").unwrap();

        let config = format!(
            concat!(
                "runtime:\n  candidates: [{}]\n",
                "install:\n  program: [{}, install]\n  index_url: null\n",
                "dependencies: [a, b, c]\n",
                "launch:\n  entry_point: app.py\n",
            ),
            runtime.display(),
            installer.display()
        );
        let project = setup_project(&config);
        let cmd = RunCommand::new(project.path(), None, RunArgs::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert_eq!(ui.progress(), [(1, 3), (2, 3), (3, 3)]);
    }
}
