//! Check command implementation.
//!
//! `basecamp check` runs the runtime gate and shows the resolved install
//! plan without touching the package environment or launching anything.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::config::{resolve_manifest, validate_manifest};
use crate::error::{BasecampError, Result};
use crate::installer::InstallPlan;
use crate::runtime::RuntimeProbe;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    manifest_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, manifest_path: Option<PathBuf>, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest_path,
            args,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
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

        let probe_result = RuntimeProbe::new(&manifest.runtime).detect();

        if self.args.json {
            let runtime = match &probe_result {
                Ok(info) => serde_json::json!({
                    "present": true,
                    "binary": info.binary,
                    "version": info.raw_version,
                }),
                Err(e) => serde_json::json!({
                    "present": false,
                    "error": e.to_string(),
                }),
            };
            let plan_runtime = probe_result
                .as_ref()
                .map(|i| i.binary.to_string_lossy().to_string())
                .unwrap_or_else(|_| manifest.runtime.candidates[0].clone());
            let plan = InstallPlan::build(&manifest, &plan_runtime, None);
            let output = serde_json::json!({
                "app_name": manifest.display_name(),
                "runtime": runtime,
                "policy": manifest.install.policy,
                "installs": plan.specs().iter().map(|s| s.render()).collect::<Vec<_>>(),
                "entry_point": manifest.launch.entry_point,
            });
            let rendered = serde_json::to_string_pretty(&output)
                .map_err(|e| anyhow::anyhow!("failed to render check output: {}", e))?;
            ui.message(&rendered);
            return Ok(match probe_result {
                Ok(_) => CommandResult::success(),
                Err(_) => CommandResult::failure(1),
            });
        }

        ui.show_header(&format!("Checking {}", manifest.display_name()));

        let info = match probe_result {
            Ok(info) => {
                ui.success(&format!(
                    "Runtime: {} ({})",
                    info.raw_version,
                    info.binary.display()
                ));
                info
            }
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        let plan = InstallPlan::build(&manifest, &info.binary.to_string_lossy(), None);
        if plan.is_empty() {
            ui.message("No dependencies to install");
        } else {
            ui.message(&format!("Install plan ({} steps):", plan.len()));
            for spec in plan.specs() {
                ui.message(&format!("  {}", spec.render()));
            }
        }
        ui.message(&format!(
            "Entry point: {}",
            manifest.launch.entry_point.display()
        ));

        Ok(CommandResult::success())
    }
}
