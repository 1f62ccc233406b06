//! Runtime discovery on PATH.
//!
//! Candidates are resolved by iterating over PATH entries directly rather
//! than shelling out to `which`. `which` behavior varies across systems
//! and is sometimes a shell builtin with inconsistent error handling. A
//! resolved binary still has to answer the version query before it counts
//! as present: a broken shim on PATH is the same as no runtime at all.

use crate::config::schema::RuntimeSpec;
use crate::error::{BasecampError, Result};
use crate::runtime::version::Version;
use crate::shell;
use std::path::{Path, PathBuf};

/// A runtime that resolved on PATH and answered its version query.
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    /// Candidate name that resolved (e.g. "python3").
    pub candidate: String,

    /// Full path to the binary.
    pub binary: PathBuf,

    /// Trimmed output of the version query.
    pub raw_version: String,

    /// Parsed version, when the output contained one.
    pub version: Option<Version>,
}

/// Probes for the language runtime described by a [`RuntimeSpec`].
pub struct RuntimeProbe<'a> {
    spec: &'a RuntimeSpec,
}

impl<'a> RuntimeProbe<'a> {
    /// Create a probe for a runtime spec.
    pub fn new(spec: &'a RuntimeSpec) -> Self {
        Self { spec }
    }

    /// Detect the runtime, walking candidates in manifest order.
    ///
    /// # Errors
    ///
    /// `RuntimeMissing` when no candidate resolves and answers the version
    /// query; `RuntimeUnsuitable` when the best candidate is below
    /// `min_version`.
    pub fn detect(&self) -> Result<RuntimeInfo> {
        let path_entries = parse_system_path();

        for candidate in &self.spec.candidates {
            let Some(binary) = resolve_candidate(candidate, &path_entries) else {
                tracing::debug!(%candidate, "not on PATH");
                continue;
            };

            match self.query_version(&binary) {
                Some(raw_version) => {
                    let version = Version::extract(&raw_version);
                    tracing::debug!(%candidate, %raw_version, "runtime resolved");
                    let info = RuntimeInfo {
                        candidate: candidate.clone(),
                        binary,
                        raw_version,
                        version,
                    };
                    return self.check_minimum(info);
                }
                None => {
                    tracing::debug!(%candidate, binary = %binary.display(), "version query failed");
                }
            }
        }

        Err(BasecampError::RuntimeMissing {
            candidates: self.spec.candidates.join(", "),
            download_url: self.spec.download_url.clone(),
        })
    }

    /// Run the version query, returning its combined output on success.
    ///
    /// Python 3.3 and earlier print the version to stderr, so both streams
    /// are considered.
    fn query_version(&self, binary: &Path) -> Option<String> {
        let result = shell::execute_quiet(
            &binary.to_string_lossy(),
            &self.spec.version_args,
            None,
        )
        .ok()?;

        if !result.success {
            return None;
        }

        let output = if result.stdout.trim().is_empty() {
            result.stderr
        } else {
            result.stdout
        };
        let trimmed = output.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn check_minimum(&self, info: RuntimeInfo) -> Result<RuntimeInfo> {
        let Some(min) = &self.spec.min_version else {
            return Ok(info);
        };
        let Some(required) = Version::parse(min) else {
            // Validator rejects unparseable minimums; don't gate on them here.
            return Ok(info);
        };

        match info.version {
            Some(found) if found < required => Err(BasecampError::RuntimeUnsuitable {
                binary: info.binary,
                message: format!("version {} is below minimum {}", found, required),
            }),
            Some(_) => Ok(info),
            None => Err(BasecampError::RuntimeUnsuitable {
                binary: info.binary,
                message: format!(
                    "could not read a version from '{}' (minimum {} required)",
                    info.raw_version, required
                ),
            }),
        }
    }
}

/// Resolve a candidate binary: names are looked up on PATH, anything with
/// a path separator is checked directly (tests point candidates at stub
/// scripts this way).
pub fn resolve_candidate(candidate: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let as_path = Path::new(candidate);
    if as_path.components().count() > 1 {
        return if as_path.is_file() && is_executable(as_path) {
            Some(as_path.to_path_buf())
        } else {
            None
        };
    }

    resolve_tool_path(candidate, path_entries)
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        for name in tool_filenames(tool) {
            let candidate = dir.join(&name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Filenames to try for a tool name. On Windows, PATH lookups go through
/// the executable extensions.
fn tool_filenames(tool: &str) -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec![
            format!("{}.exe", tool),
            format!("{}.bat", tool),
            format!("{}.cmd", tool),
            tool.to_string(),
        ]
    } else {
        vec![tool.to_string()]
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}
