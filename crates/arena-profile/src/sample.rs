use serde::{Deserialize, Serialize};

use crate::request::Finalized;

/// One completed request cycle. Timestamps are clock milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub order: u64,
    pub called_at: u64,
    pub issued_at: u64,
    pub completed_at: u64,
    pub success: bool,
    pub resource_cost: Option<u64>,
    pub unit_price: Option<u128>,
}

impl Sample {
    /// Time from the call to the terminal receipt.
    pub fn latency(&self) -> u64 {
        self.completed_at.saturating_sub(self.called_at)
    }
}

/// A sample still waiting for its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEntry {
    pub order: u64,
    pub called_at: u64,
    pub issued_at: u64,
}

impl PendingEntry {
    pub fn finish<R: Finalized>(self, completed_at: u64, receipt: &R) -> Sample {
        Sample {
            order: self.order,
            called_at: self.called_at,
            issued_at: self.issued_at,
            completed_at,
            success: receipt.succeeded(),
            resource_cost: receipt.resource_cost(),
            unit_price: receipt.unit_price(),
        }
    }
}
