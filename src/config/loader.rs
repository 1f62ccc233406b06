//! Manifest discovery and loading.
//!
//! This module handles finding and loading manifest files from their
//! locations in the correct priority order.

use crate::config::schema::Manifest;
use crate::error::{BasecampError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths to manifest files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global manifest (`~/.basecamp/config.yml`)
/// 2. Project manifest (`.basecamp/config.yml`)
/// 3. Local overrides (`.basecamp/config.local.yml`)
///
/// When none of these exist, [`Manifest::builtin`] is used, so a bare
/// `basecamp` in a directory with no configuration behaves exactly like
/// the stock launcher script.
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    /// User's global manifest: ~/.basecamp/config.yml
    pub user_global: Option<PathBuf>,

    /// Project manifest: .basecamp/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .basecamp/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ManifestPaths {
    /// Discover manifest files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: Self::find_user_global(),
            project: existing(project_root.join(".basecamp").join("config.yml")),
            project_local: existing(project_root.join(".basecamp").join("config.local.yml")),
        }
    }

    fn find_user_global() -> Option<PathBuf> {
        existing(dirs::home_dir()?.join(".basecamp").join("config.yml"))
    }

    /// Returns all existing manifest paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Check if any project manifest exists.
    pub fn has_project_manifest(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the manifest path for the `run --verbose` display, if any.
pub fn find_manifest(project_root: &Path) -> Option<PathBuf> {
    let paths = ManifestPaths::discover(project_root);
    paths.project.or(paths.project_local).or(paths.user_global)
}

/// Load a single manifest file and parse it.
///
/// # Errors
///
/// Returns `ManifestNotFound` if the file doesn't exist.
/// Returns `ManifestParseError` if the YAML is invalid.
pub fn load_manifest_file(path: &Path) -> Result<Manifest> {
    let content = read_manifest(path)?;
    parse_manifest(&content, path)
}

/// Parse YAML content into a [`Manifest`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<Manifest> {
    serde_yaml::from_str(content).map_err(|e| BasecampError::ManifestParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge all manifest files for a project.
///
/// Files merge at mapping level: a key in a later file replaces the same
/// key in an earlier one, nested mappings merge recursively, sequences
/// replace wholesale (a local override of `dependencies` is the whole
/// list, never an append).
///
/// Falls back to the built-in manifest when no file exists.
pub fn load_manifest(project_root: &Path) -> Result<Manifest> {
    let paths = ManifestPaths::discover(project_root);
    let existing = paths.all_existing();

    if existing.is_empty() {
        tracing::debug!("No manifest found, using built-in defaults");
        return Ok(Manifest::builtin());
    }

    let mut merged: Option<serde_yaml::Value> = None;
    for path in existing {
        let content = read_manifest(path)?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| BasecampError::ManifestParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;
        merged = Some(match merged {
            Some(base) => merge_values(base, value),
            None => value,
        });
    }

    let merged = merged.unwrap_or(serde_yaml::Value::Null);
    if merged.is_null() {
        // An existing-but-empty file behaves like an absent one
        return Ok(Manifest::builtin());
    }
    serde_yaml::from_value(merged).map_err(|e| BasecampError::ManifestParseError {
        path: project_root.join(".basecamp").join("config.yml"),
        message: e.to_string(),
    })
}

/// Load the manifest a command should use: an explicit `--config` path
/// when given, otherwise the discovered-and-merged project files.
pub fn resolve_manifest(project_root: &Path, explicit: Option<&Path>) -> Result<Manifest> {
    match explicit {
        Some(path) => load_manifest_file(path),
        None => load_manifest(project_root),
    }
}

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BasecampError::ManifestNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BasecampError::Io(e)
        }
    })
}

/// Merge two YAML values, with `overlay` taking precedence.
///
/// Mappings merge key-by-key recursively; everything else (sequences,
/// scalars) is replaced by the overlay value.
fn merge_values(base: serde_yaml::Value, overlay: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;

    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}
