use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Number of most recent completed samples kept for aggregates.
    pub window_capacity: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            window_capacity: 10,
        }
    }
}

impl ProfilerConfig {
    pub fn with_window_capacity(window_capacity: usize) -> Self {
        Self { window_capacity }
    }
}
