/*!
 * Lock Configuration
 *
 * Runtime configuration for lock acquisition
 */

use serde::{Deserialize, Serialize};

/// How `ScopedLock::acquire` behaves when the resource is held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquirePolicy {
    /// Wait until the resource is released
    #[default]
    Block,
    /// Fail immediately with `LockError::Acquisition`
    FailFast,
}

/// Lock configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub policy: AcquirePolicy,
}

impl LockConfig {
    pub const fn fail_fast() -> Self {
        Self {
            policy: AcquirePolicy::FailFast,
        }
    }
}
