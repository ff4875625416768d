use std::sync::atomic::{AtomicU8, Ordering};

use arena_core::CorrelationId;
use arena_profile::{Finalized, ProfilerConfig, Submitted, TickClock, TxProfiler};

#[derive(Debug, Clone)]
struct Receipt(CorrelationId);

impl Finalized for Receipt {
    fn correlation_id(&self) -> CorrelationId {
        self.0
    }
    fn succeeded(&self) -> bool {
        true
    }
    fn resource_cost(&self) -> Option<u64> {
        Some(1)
    }
    fn unit_price(&self) -> Option<u128> {
        Some(1)
    }
}

#[derive(Debug)]
struct Pending(CorrelationId);

impl Submitted for Pending {
    type Receipt = Receipt;
    type Error = String;

    fn correlation_id(&self) -> CorrelationId {
        self.0
    }

    async fn wait(&self) -> Result<Receipt, String> {
        Ok(Receipt(self.0))
    }
}

/// Stands in for the remote service: hands out a fresh correlation id per call.
#[derive(Debug, Default)]
struct Service {
    next: AtomicU8,
}

impl Service {
    async fn submit(&self) -> Result<Pending, String> {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Pending(CorrelationId([n; 32])))
    }
}

#[tokio::test]
async fn steady_tick_clock_averages_two_ticks() {
    let profiler = TxProfiler::with_clock(
        &ProfilerConfig::with_window_capacity(3),
        TickClock::new(0, 1),
    );
    let service = Service::default();

    for i in 0..5 {
        let pending = profiler
            .issue(|| service.submit())
            .await
            .expect("submit should succeed");
        profiler.complete(&pending).await.expect("receipt");
        if i == 0 {
            continue;
        }

        // called, issued and completed each read the clock once.
        assert_eq!(profiler.latency(), 2.0);
        assert_eq!(profiler.cost(), 1);
        assert_eq!(profiler.price(), 1);
        assert_eq!(profiler.last_latency(), 2);
    }

    assert_eq!(profiler.window_len(), 3);
    let orders: Vec<u64> = profiler.samples().iter().map(|s| s.order).collect();
    assert_eq!(orders, vec![3, 4, 5]);
    let last = profiler.last_sample().expect("window is full");
    assert_eq!(last.issued_at, last.called_at + 1);
}

#[tokio::test]
async fn identical_latencies_average_to_that_latency() {
    // Each cycle takes three readings spaced 7ms apart.
    let profiler = TxProfiler::with_clock(&ProfilerConfig::default(), TickClock::new(50, 7));
    let service = Service::default();

    for _ in 0..12 {
        let pending = profiler
            .issue(|| service.submit())
            .await
            .expect("submit should succeed");
        profiler.complete(&pending).await.expect("receipt");
    }

    assert_eq!(profiler.window_len(), 10);
    assert_eq!(profiler.latency(), 14.0);
}
