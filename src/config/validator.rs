//! Manifest validation.
//!
//! Catches structural problems before any subprocess runs, so a bad
//! manifest fails with one actionable message instead of a confusing
//! installer error halfway through the sequence.

use crate::config::schema::Manifest;
use crate::error::{BasecampError, Result};
use crate::runtime::version::Version;

/// Validate a loaded manifest.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    let mut problems = Vec::new();

    if manifest.runtime.candidates.is_empty() {
        problems.push("runtime.candidates must list at least one binary name".to_string());
    }

    if manifest
        .runtime
        .candidates
        .iter()
        .any(|c| c.trim().is_empty())
    {
        problems.push("runtime.candidates must not contain empty names".to_string());
    }

    if let Some(min) = &manifest.runtime.min_version {
        if Version::parse(min).is_none() {
            problems.push(format!(
                "runtime.min_version '{}' is not a dotted version number",
                min
            ));
        }
    }

    if let Some(url) = &manifest.install.index_url {
        if !is_http_url(url) {
            problems.push(format!("install.index_url '{}' is not an http(s) URL", url));
        }
    }

    for dep in &manifest.dependencies {
        if dep.name.trim().is_empty() {
            problems.push("dependencies must not contain empty package names".to_string());
        }
        if let Some(url) = &dep.index_url {
            if !is_http_url(url) {
                problems.push(format!(
                    "index_url '{}' for dependency '{}' is not an http(s) URL",
                    url, dep.name
                ));
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    for dep in &manifest.dependencies {
        if !seen.insert(dep.name.to_lowercase()) {
            problems.push(format!("dependency '{}' is listed more than once", dep.name));
        }
    }

    if manifest.launch.entry_point.as_os_str().is_empty() {
        problems.push("launch.entry_point must not be empty".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(BasecampError::ManifestValidationError {
            message: problems.join("; "),
        })
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
