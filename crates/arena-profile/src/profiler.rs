use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use arena_core::{BoundedWindow, CorrelationId};
use tracing::{debug, error, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ProfilerConfig;
use crate::error::ProfileError;
use crate::mean::MeanAccumulator;
use crate::request::{Finalized, Submitted};
use crate::sample::{PendingEntry, Sample};

/// Callback run after every successful `complete`.
pub type UpdateObserver<C> = Box<dyn Fn(&TxProfiler<C>) + Send + Sync>;

#[derive(Debug)]
struct ProfilerState {
    order: u64,
    pending: HashMap<CorrelationId, PendingEntry>,
    window: BoundedWindow<Sample>,
}

impl ProfilerState {
    fn new(capacity: usize) -> Self {
        Self {
            order: 1,
            pending: HashMap::new(),
            window: BoundedWindow::new(capacity),
        }
    }
}

/// Measures issue to finalization cycles over a trailing window.
///
/// Several requests may be in flight at once; each is matched to its receipt
/// by correlation id. The state lock is never held across an await.
pub struct TxProfiler<C = SystemClock> {
    clock: C,
    state: Mutex<ProfilerState>,
    on_update: Option<UpdateObserver<C>>,
}

impl TxProfiler<SystemClock> {
    pub fn new(config: &ProfilerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for TxProfiler<SystemClock> {
    fn default() -> Self {
        Self::new(&ProfilerConfig::default())
    }
}

impl<C: Clock> TxProfiler<C> {
    pub fn with_clock(config: &ProfilerConfig, clock: C) -> Self {
        Self {
            clock,
            state: Mutex::new(ProfilerState::new(config.window_capacity)),
            on_update: None,
        }
    }

    /// Installs the observer called after each completed request.
    pub fn on_update(mut self, observer: impl Fn(&TxProfiler<C>) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(observer));
        self
    }

    fn state(&self) -> MutexGuard<'_, ProfilerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `operation` and records its request as pending.
    ///
    /// The call time and sequence order are captured before the operation
    /// starts, the issue time once it has been acknowledged.
    pub async fn issue<F, Fut, S>(&self, operation: F) -> Result<S, ProfileError<S::Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, S::Error>>,
        S: Submitted,
    {
        let called_at = self.clock.now_millis();
        let order = {
            let mut state = self.state();
            let order = state.order;
            state.order += 1;
            order
        };

        let handle = operation().await.map_err(ProfileError::Operation)?;

        let issued_at = self.clock.now_millis();
        let correlation_id = handle.correlation_id();
        self.state().pending.insert(
            correlation_id,
            PendingEntry {
                order,
                called_at,
                issued_at,
            },
        );
        debug!(order, %correlation_id, "request issued");
        Ok(handle)
    }

    /// Waits for `handle` to finalize and pushes its sample into the window.
    ///
    /// Failed receipts are recorded with `success = false` and returned as
    /// `Ok`. The handle must have been issued through this profiler and its
    /// receipt must carry the same correlation id; either violation drops the
    /// pending entry without recording a sample.
    pub async fn complete<S: Submitted>(
        &self,
        handle: &S,
    ) -> Result<S::Receipt, ProfileError<S::Error>> {
        let receipt = match handle.wait().await {
            Ok(receipt) => receipt,
            Err(err) => {
                let correlation_id = handle.correlation_id();
                self.state().pending.remove(&correlation_id);
                warn!(%correlation_id, "finalization could not be observed");
                return Err(ProfileError::Finalize(err));
            }
        };

        let correlation_id = handle.correlation_id();
        let sample = {
            let mut state = self.state();
            let Some(entry) = state.pending.remove(&correlation_id) else {
                error!(%correlation_id, "handle was never issued by this profiler");
                return Err(ProfileError::UnknownCorrelation(correlation_id));
            };
            let finalized = receipt.correlation_id();
            if finalized != correlation_id {
                error!(issued = %correlation_id, %finalized, "receipt belongs to another request");
                return Err(ProfileError::CorrelationMismatch {
                    issued: correlation_id,
                    finalized,
                });
            }
            let sample = entry.finish(self.clock.now_millis(), &receipt);
            state.window.push(sample.clone());
            sample
        };

        if sample.success {
            debug!(order = sample.order, latency = sample.latency(), "request finalized");
        } else {
            warn!(order = sample.order, %correlation_id, "request finalized with failure status");
        }

        if let Some(observer) = &self.on_update {
            observer(self);
        }
        Ok(receipt)
    }

    /// Mean of `completed_at - called_at` over the window, zero when empty.
    pub fn latency(&self) -> f64 {
        let state = self.state();
        if state.window.is_empty() {
            return 0.0;
        }
        let total: u128 = state
            .window
            .iter()
            .map(|sample| u128::from(sample.latency()))
            .sum();
        total as f64 / state.window.len() as f64
    }

    /// Mean resource cost. Samples without a cost count as zero.
    pub fn cost(&self) -> u128 {
        let state = self.state();
        let mut mean = MeanAccumulator::new(state.window.len());
        mean.extend(
            state
                .window
                .iter()
                .filter_map(|sample| sample.resource_cost)
                .map(u128::from),
        );
        mean.mean()
    }

    /// Mean unit price. Samples without a price count as zero.
    pub fn price(&self) -> u128 {
        let state = self.state();
        let mut mean = MeanAccumulator::new(state.window.len());
        mean.extend(state.window.iter().filter_map(|sample| sample.unit_price));
        mean.mean()
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.state().window.last().cloned()
    }

    pub fn last_latency(&self) -> u64 {
        self.state().window.last().map_or(0, Sample::latency)
    }

    pub fn last_cost(&self) -> u128 {
        self.state()
            .window
            .last()
            .and_then(|sample| sample.resource_cost)
            .map_or(0, u128::from)
    }

    pub fn last_price(&self) -> u128 {
        self.state()
            .window
            .last()
            .and_then(|sample| sample.unit_price)
            .unwrap_or(0)
    }

    /// Window contents, oldest first.
    pub fn samples(&self) -> Vec<Sample> {
        self.state().window.iter().cloned().collect()
    }

    /// Clears the order counter, pending requests and the window.
    pub fn reset(&self) {
        let mut state = self.state();
        let capacity = state.window.capacity();
        *state = ProfilerState::new(capacity);
    }

    pub fn pending_len(&self) -> usize {
        self.state().pending.len()
    }

    pub fn window_len(&self) -> usize {
        self.state().window.len()
    }

    pub fn capacity(&self) -> usize {
        self.state().window.capacity()
    }
}

impl<C: fmt::Debug> fmt::Debug for TxProfiler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxProfiler")
            .field("clock", &self.clock)
            .field("state", &self.state)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}
