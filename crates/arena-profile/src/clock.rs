use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond time source used to stamp samples.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock in milliseconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

#[derive(Debug)]
struct TickState {
    next: u64,
    tick: u64,
    script: VecDeque<u64>,
}

/// Deterministic clock: every reading advances time by a fixed tick.
///
/// Scripted readings are returned first, in order; afterwards the clock keeps
/// ticking from the last scripted value.
#[derive(Debug)]
pub struct TickClock {
    state: Mutex<TickState>,
}

impl TickClock {
    pub fn new(start: u64, tick: u64) -> Self {
        Self {
            state: Mutex::new(TickState {
                next: start,
                tick,
                script: VecDeque::new(),
            }),
        }
    }

    pub fn from_readings(readings: impl IntoIterator<Item = u64>, tick: u64) -> Self {
        Self {
            state: Mutex::new(TickState {
                next: 0,
                tick,
                script: readings.into_iter().collect(),
            }),
        }
    }
}

impl Clock for TickClock {
    fn now_millis(&self) -> u64 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = state.script.pop_front().unwrap_or(state.next);
        state.next = now.saturating_add(state.tick);
        now
    }
}
