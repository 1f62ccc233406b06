//! Manifest schema definitions for Basecamp.
//!
//! This module contains all the struct definitions that map to the YAML
//! manifest format. [`Manifest::builtin`] reproduces the behavior of the
//! stock launcher (Python runtime, five packages from a region-local PyPI
//! mirror, `video_editor.py` entry point) so that running Basecamp with no
//! manifest on disk is equivalent to running the original script.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Default package index mirror used when neither the manifest nor the
/// CLI supplies one.
pub const DEFAULT_INDEX_URL: &str = "https://pypi.tuna.tsinghua.edu.cn/simple";

/// Where to send the user when no runtime is found.
pub const DEFAULT_DOWNLOAD_URL: &str = "https://www.python.org/downloads/";

/// Root manifest structure for .basecamp/config.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Application name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Runtime probe settings
    pub runtime: RuntimeSpec,

    /// Package installation settings
    pub install: InstallSettings,

    /// Ordered, flat dependency list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencySpec>,

    /// Application launch settings
    pub launch: LaunchSpec,

    /// Wait for acknowledgment before the terminal closes
    #[serde(skip_serializing_if = "is_true")]
    pub pause: bool,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            app_name: None,
            runtime: RuntimeSpec::default(),
            install: InstallSettings::default(),
            dependencies: Vec::new(),
            launch: LaunchSpec::default(),
            pause: true,
        }
    }
}

impl Manifest {
    /// The built-in manifest: what runs when no config file exists.
    pub fn builtin() -> Self {
        Self {
            app_name: Some("Video Editor".to_string()),
            dependencies: vec![
                DependencySpec::pinned("moviepy", "1.0.3"),
                DependencySpec::unpinned("PyQt5"),
                DependencySpec::unpinned("numpy"),
                DependencySpec::unpinned("opencv-python"),
                DependencySpec::unpinned("Pillow"),
            ],
            ..Default::default()
        }
    }

    /// Display name for headers and summaries.
    pub fn display_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or("application")
    }
}

/// How to find and verify the language runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSpec {
    /// Candidate binary names, probed in order.
    pub candidates: Vec<String>,

    /// Arguments for the version query.
    pub version_args: Vec<String>,

    /// Minimum acceptable version (e.g. "3.8"). None accepts anything
    /// that answers the version query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,

    /// Remediation URL shown when no candidate resolves.
    pub download_url: String,
}

impl Default for RuntimeSpec {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            version_args: vec!["--version".to_string()],
            min_version: None,
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }
}

/// The `py` launcher only exists on Windows; on Unix `python` may still be
/// Python 2, so `python3` is probed first.
fn default_candidates() -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec![
            "python".to_string(),
            "python3".to_string(),
            "py".to_string(),
        ]
    } else {
        vec!["python3".to_string(), "python".to_string()]
    }
}

/// Package installation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    /// Installer argv prefix. Empty means `<runtime> -m pip install`,
    /// which always targets the environment of the probed runtime rather
    /// than whatever `pip` happens to be on PATH.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program: Vec<String>,

    /// Package index mirror, passed as `-i <url>` on every install.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,

    /// What a failed install does to the rest of the sequence.
    pub policy: InstallPolicy,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            program: Vec::new(),
            index_url: Some(DEFAULT_INDEX_URL.to_string()),
            policy: InstallPolicy::default(),
        }
    }
}

impl InstallSettings {
    /// Resolve the installer argv prefix for the probed runtime.
    pub fn installer_argv(&self, runtime: &str) -> Vec<String> {
        if self.program.is_empty() {
            vec![
                runtime.to_string(),
                "-m".to_string(),
                "pip".to_string(),
                "install".to_string(),
            ]
        } else {
            self.program.clone()
        }
    }
}

/// Failure policy for the install sequence.
///
/// The stock launcher tolerated install failures silently. Basecamp makes
/// the choice explicit: best-effort keeps that behavior (but summarizes
/// failures), fail-fast stops at the first failure and never launches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallPolicy {
    #[default]
    BestEffort,
    FailFast,
}

/// One dependency to install.
///
/// Deserializes from either a requirement string (`"moviepy==1.0.3"`) or
/// a detailed mapping with `name`, `version`, and `index_url` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
    /// Package name as the index knows it.
    pub name: String,

    /// Exact version pin. None installs (or upgrades to) whatever the
    /// index resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Per-dependency index override; beats `install.index_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
}

impl DependencySpec {
    /// A dependency pinned to an exact version.
    pub fn pinned(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.to_string()),
            index_url: None,
        }
    }

    /// A floating dependency.
    pub fn unpinned(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            index_url: None,
        }
    }

    /// Parse a requirement string of the form `name` or `name==version`.
    pub fn parse(requirement: &str) -> Self {
        match requirement.split_once("==") {
            Some((name, version)) => Self {
                name: name.trim().to_string(),
                version: Some(version.trim().to_string()),
                index_url: None,
            },
            None => Self {
                name: requirement.trim().to_string(),
                version: None,
                index_url: None,
            },
        }
    }

    /// The requirement string handed to the installer.
    pub fn requirement(&self) -> String {
        match &self.version {
            Some(version) => format!("{}=={}", self.name, version),
            None => self.name.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for DependencySpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Requirement(String),
            Detailed {
                name: String,
                #[serde(default)]
                version: Option<String>,
                #[serde(default)]
                index_url: Option<String>,
            },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Requirement(s) => Ok(DependencySpec::parse(&s)),
            Raw::Detailed {
                name,
                version,
                index_url,
            } => Ok(Self {
                name,
                version,
                index_url,
            }),
        }
    }
}

/// How to launch the application once the environment is ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSpec {
    /// Script or module path handed to the runtime.
    pub entry_point: PathBuf,

    /// Extra arguments appended after the entry point.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Working directory for the child (relative to the project root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl Default for LaunchSpec {
    fn default() -> Self {
        Self {
            entry_point: PathBuf::from("video_editor.py"),
            args: Vec::new(),
            cwd: None,
        }
    }
}

fn is_true(v: &bool) -> bool {
    *v
}
