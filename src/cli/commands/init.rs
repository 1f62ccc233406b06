//! Init command implementation.
//!
//! `basecamp init` writes the built-in manifest to `.basecamp/config.yml`
//! so a project can customize it. Until then, the built-in defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::Manifest;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = self.project_root.join(".basecamp");
        let path = dir.join("config.yml");

        if path.exists() && !self.args.force {
            let overwrite = ui.is_interactive()
                && ui.confirm("Manifest already exists. Overwrite it?", false)?;
            if !overwrite {
                ui.error(&format!(
                    "Manifest already exists at {} (use --force to overwrite)",
                    path.display()
                ));
                return Ok(CommandResult::failure(1));
            }
        }

        fs::create_dir_all(&dir)?;
        let yaml = serde_yaml::to_string(&Manifest::builtin())
            .map_err(|e| anyhow::anyhow!("failed to serialize built-in manifest: {}", e))?;
        fs::write(&path, yaml)?;

        ui.success(&format!("Created {}", path.display()));
        ui.message("Edit it to point at your runtime, dependencies, and entry point.");
        Ok(CommandResult::success())
    }
}
