//! Windowed latency and cost profiling of issue/finalize request cycles.
//!
//! A [`TxProfiler`] stamps each request when it is issued and when its
//! terminal receipt arrives, then reports aggregates over the most recent
//! completed samples.

pub mod clock;
pub mod config;
pub mod error;
pub mod mean;
pub mod profiler;
pub mod request;
pub mod sample;

pub use clock::{Clock, SystemClock, TickClock};
pub use config::ProfilerConfig;
pub use error::ProfileError;
pub use mean::MeanAccumulator;
pub use profiler::TxProfiler;
pub use request::{Finalized, Submitted};
pub use sample::{PendingEntry, Sample};
