//! Basecamp - Environment bootstrap and launch supervisor.
//!
//! Basecamp replaces ad-hoc launcher scripts with a declarative YAML
//! manifest and a polished CLI: it verifies a language runtime is present,
//! installs a flat list of packages from a configurable index mirror, and
//! then launches the target application, pausing for acknowledgment before
//! the terminal closes.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Manifest loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`installer`] - Install plan construction and sequential execution
//! - [`launcher`] - Application spawning and supervision
//! - [`runtime`] - Runtime probing and version checks
//! - [`shell`] - Subprocess execution
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use basecamp::config::Manifest;
//! use basecamp::installer::InstallPlan;
//!
//! // The built-in manifest reproduces the stock launcher behavior
//! let manifest = Manifest::builtin();
//! let plan = InstallPlan::build(&manifest, "python3", None);
//! assert_eq!(plan.specs().len(), manifest.dependencies.len());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod launcher;
pub mod runtime;
pub mod shell;
pub mod ui;

pub use error::{BasecampError, Result};
