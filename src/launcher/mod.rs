//! Application spawning and supervision.
//!
//! The launch step is the last and least opinionated part of the
//! sequence: spawn the entry point as a foreground child with inherited
//! stdio, block until it exits, and report what happened. Failures here
//! are deferred: a spawn error or a non-zero application exit is surfaced
//! to the terminal but never classified, retried, or allowed to change
//! the launcher's own exit code.

use crate::config::schema::LaunchSpec;
use crate::shell::command::render_command;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

/// What happened when the application was launched.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    /// The rendered command line, for display.
    pub command: String,

    /// Application exit code (None if killed by signal or never spawned).
    pub exit_code: Option<i32>,

    /// How long the application ran.
    pub duration: Duration,

    /// Spawn error, when the child never started.
    pub error: Option<String>,
}

impl LaunchOutcome {
    /// Whether the child process actually started.
    pub fn spawned(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the application exited zero.
    pub fn clean_exit(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Spawn the application and block until it exits.
///
/// stdio is inherited: the application owns the terminal for as long as
/// it runs. There is no timeout and no interposition; interrupting the
/// child is the terminal's job.
pub fn launch(runtime: &Path, spec: &LaunchSpec, project_root: &Path) -> LaunchOutcome {
    let mut args: Vec<String> = vec![spec.entry_point.to_string_lossy().to_string()];
    args.extend(spec.args.iter().cloned());

    let program = runtime.to_string_lossy().to_string();
    let command = render_command(&program, &args);

    let cwd = match &spec.cwd {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => project_root.join(dir),
        None => project_root.to_path_buf(),
    };

    tracing::debug!(%command, cwd = %cwd.display(), "launching application");

    let start = Instant::now();
    let mut child = match Command::new(&program).args(&args).current_dir(&cwd).spawn() {
        Ok(child) => child,
        Err(e) => {
            return LaunchOutcome {
                command,
                exit_code: None,
                duration: start.elapsed(),
                error: Some(e.to_string()),
            };
        }
    };

    match child.wait() {
        Ok(status) => LaunchOutcome {
            command,
            exit_code: status.code(),
            duration: start.elapsed(),
            error: None,
        },
        Err(e) => LaunchOutcome {
            command,
            exit_code: None,
            duration: start.elapsed(),
            error: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn fake_runtime(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("runtime");
        // Stub interpreter: exits with the code named in its entry "script"
        fs::write(&path, "#!/bin/sh\nexit $(cat \"$1\")\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    #[cfg(unix)]
    fn launch_reports_clean_exit() {
        let temp = TempDir::new().unwrap();
        let runtime = fake_runtime(temp.path());
        fs::write(temp.path().join("app.py"), "0").unwrap();

        let spec = LaunchSpec {
            entry_point: PathBuf::from("app.py"),
            ..Default::default()
        };

        let outcome = launch(&runtime, &spec, temp.path());
        assert!(outcome.spawned());
        assert!(outcome.clean_exit());
    }

    #[test]
    #[cfg(unix)]
    fn launch_reports_application_exit_code() {
        let temp = TempDir::new().unwrap();
        let runtime = fake_runtime(temp.path());
        fs::write(temp.path().join("app.py"), "7").unwrap();

        let spec = LaunchSpec {
            entry_point: PathBuf::from("app.py"),
            ..Default::default()
        };

        let outcome = launch(&runtime, &spec, temp.path());
        assert!(outcome.spawned());
        assert_eq!(outcome.exit_code, Some(7));
        assert!(!outcome.clean_exit());
    }

    #[test]
    fn launch_missing_runtime_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let spec = LaunchSpec::default();

        let outcome = launch(
            Path::new("/nonexistent/runtime-xyz"),
            &spec,
            temp.path(),
        );

        assert!(!outcome.spawned());
        assert!(outcome.exit_code.is_none());
        assert!(outcome.error.is_some());
    }

    #[test]
    #[cfg(unix)]
    fn launch_runs_in_configured_cwd() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("app");
        fs::create_dir_all(&subdir).unwrap();
        let runtime = fake_runtime(temp.path());
        fs::write(subdir.join("app.py"), "0").unwrap();

        let spec = LaunchSpec {
            entry_point: PathBuf::from("app.py"),
            cwd: Some(PathBuf::from("app")),
            ..Default::default()
        };

        let outcome = launch(&runtime, &spec, temp.path());
        assert!(outcome.clean_exit());
    }

    #[test]
    fn outcome_command_renders_argv() {
        let outcome = LaunchOutcome {
            command: "python3 video_editor.py".to_string(),
            exit_code: Some(0),
            duration: Duration::ZERO,
            error: None,
        };
        assert!(outcome.command.contains("video_editor.py"));
    }
}
