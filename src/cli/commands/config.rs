//! Config command implementation.
//!
//! `basecamp config` prints the fully resolved manifest (after file
//! merging and defaults), so what you see is exactly what `run` will do.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::resolve_manifest;
use crate::error::{BasecampError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    manifest_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, manifest_path: Option<PathBuf>, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest_path,
            args,
        }
    }
}

impl Command for ConfigCommand {
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

        let rendered = if self.args.json {
            serde_json::to_string_pretty(&manifest)
                .map_err(|e| anyhow::anyhow!("failed to render manifest as JSON: {}", e))?
        } else {
            serde_yaml::to_string(&manifest)
                .map_err(|e| anyhow::anyhow!("failed to render manifest as YAML: {}", e))?
        };

        ui.message(&rendered);
        Ok(CommandResult::success())
    }
}
