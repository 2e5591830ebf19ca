/*!
 * Arena Configuration
 *
 * Capacity budget and pressure thresholds for an arena
 */

use crate::core::limits::{
    DEFAULT_ARENA_CAPACITY, DEFAULT_GC_THRESHOLD, PRESSURE_CRITICAL_RATIO, PRESSURE_MEDIUM_RATIO,
    PRESSURE_WARNING_RATIO,
};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Arena capacity must be non-zero")]
    ZeroCapacity,

    #[error("Pressure thresholds must satisfy 0 < medium <= warning <= critical <= 1 (got {medium}, {warning}, {critical})")]
    ThresholdOrder {
        medium: f64,
        warning: f64,
        critical: f64,
    },

    #[error("GC threshold must be non-zero")]
    ZeroGcThreshold,

    #[error("Process-wide arena is already initialized")]
    AlreadyInitialized,
}

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Total bytes that may be live at once
    pub capacity: Size,
    pub medium_threshold: f64,
    pub warning_threshold: f64,
    pub critical_threshold: f64,
    /// Tombstones accumulated before an automatic collection
    pub gc_threshold: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_ARENA_CAPACITY,
            medium_threshold: PRESSURE_MEDIUM_RATIO,
            warning_threshold: PRESSURE_WARNING_RATIO,
            critical_threshold: PRESSURE_CRITICAL_RATIO,
            gc_threshold: DEFAULT_GC_THRESHOLD,
        }
    }
}

impl ArenaConfig {
    /// Configuration with a custom capacity (useful for testing)
    pub fn with_capacity(capacity: Size) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn with_thresholds(mut self, medium: f64, warning: f64, critical: f64) -> Self {
        self.medium_threshold = medium;
        self.warning_threshold = warning;
        self.critical_threshold = critical;
        self
    }

    pub fn with_gc_threshold(mut self, gc_threshold: usize) -> Self {
        self.gc_threshold = gc_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let ordered = 0.0 < self.medium_threshold
            && self.medium_threshold <= self.warning_threshold
            && self.warning_threshold <= self.critical_threshold
            && self.critical_threshold <= 1.0;
        if !ordered {
            return Err(ConfigError::ThresholdOrder {
                medium: self.medium_threshold,
                warning: self.warning_threshold,
                critical: self.critical_threshold,
            });
        }
        if self.gc_threshold == 0 {
            return Err(ConfigError::ZeroGcThreshold);
        }
        Ok(())
    }
}
