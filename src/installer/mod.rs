//! Install plan construction and sequential execution.
//!
//! The flat dependency list from the manifest is resolved once into an
//! [`InstallPlan`] (one installer invocation per dependency, in manifest
//! order) before anything runs. The [`InstallExecutor`] then walks the
//! plan strictly sequentially under an explicit failure policy.

pub mod executor;
pub mod plan;

pub use executor::{InstallExecutor, InstallOutcome, InstallProgress, InstallReport};
pub use plan::{InstallPlan, InstallSpec};
