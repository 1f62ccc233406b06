//! Runtime probing and version checks.
//!
//! The runtime-presence check is the hard gate of the bootstrap sequence:
//! nothing installs and nothing launches until a candidate interpreter is
//! resolved on PATH and answers its version query.

pub mod probe;
pub mod version;

pub use probe::{resolve_tool_path, RuntimeInfo, RuntimeProbe};
pub use version::Version;
