//! Engine configuration schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scheduling::AllocationPolicy;

/// Deployment configuration for the boarding engine.
///
/// # Examples
///
/// ```
/// use catlodge::config::EngineConfig;
///
/// let config: EngineConfig = serde_yaml::from_str(
///     "allocator:\n  prefer_empty_when_private: false\n",
/// ).unwrap();
/// assert!(!config.allocation_policy().prefer_empty_when_private);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory holding the store file. Defaults to the caller's choice
    /// (the CLI falls back to `~/.catlodge`).
    pub data_dir: Option<PathBuf>,

    /// Allocator policy knobs.
    pub allocator: Option<AllocationPolicy>,

    /// Maximum time to wait for store lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,
}

impl EngineConfig {
    /// Returns the allocator policy, defaulted when unset.
    #[must_use]
    pub fn allocation_policy(&self) -> AllocationPolicy {
        self.allocator.unwrap_or_default()
    }
}
