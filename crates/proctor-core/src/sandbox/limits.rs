//! Resource limits for the embedded interpreter

use rhai::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resource limits applied to every interpreter instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxLimits {
    /// Interpreter operations allowed per load and per case
    #[serde(default = "default_max_operations")]
    pub max_operations: u64,

    /// Maximum function call depth
    #[serde(default = "default_max_call_levels")]
    pub max_call_levels: usize,

    /// Maximum expression nesting depth
    #[serde(default = "default_max_expr_depth")]
    pub max_expr_depth: usize,

    /// Maximum string length in bytes
    #[serde(default = "default_max_string_size")]
    pub max_string_size: usize,

    /// Maximum array length
    #[serde(default = "default_max_array_size")]
    pub max_array_size: usize,

    /// Maximum object map size
    #[serde(default = "default_max_map_size")]
    pub max_map_size: usize,

    /// Wall-clock budget per load and per case
    #[serde(default = "default_time_limit", with = "humantime_serde")]
    pub time_limit: Duration,
}

fn default_max_operations() -> u64 {
    5_000_000
}

fn default_max_call_levels() -> usize {
    64
}

fn default_max_expr_depth() -> usize {
    64
}

fn default_max_string_size() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_max_array_size() -> usize {
    100_000
}

fn default_max_map_size() -> usize {
    100_000
}

fn default_time_limit() -> Duration {
    Duration::from_secs(2)
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            max_operations: default_max_operations(),
            max_call_levels: default_max_call_levels(),
            max_expr_depth: default_max_expr_depth(),
            max_string_size: default_max_string_size(),
            max_array_size: default_max_array_size(),
            max_map_size: default_max_map_size(),
            time_limit: default_time_limit(),
        }
    }
}

impl SandboxLimits {
    /// Tight limits, useful for tests and small problems
    pub fn strict() -> Self {
        Self {
            max_operations: 100_000,
            max_call_levels: 16,
            max_expr_depth: 32,
            max_string_size: 64 * 1024,
            max_array_size: 10_000,
            max_map_size: 10_000,
            time_limit: Duration::from_millis(500),
        }
    }

    /// Set the operation budget
    pub fn with_max_operations(mut self, max_operations: u64) -> Self {
        self.max_operations = max_operations;
        self
    }

    /// Set the wall-clock budget
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Install the limits on an engine
    pub(crate) fn apply(&self, engine: &mut Engine) {
        engine
            .set_max_operations(self.max_operations)
            .set_max_call_levels(self.max_call_levels)
            .set_max_expr_depths(self.max_expr_depth, self.max_expr_depth)
            .set_max_string_size(self.max_string_size)
            .set_max_array_size(self.max_array_size)
            .set_max_map_size(self.max_map_size);
    }
}
