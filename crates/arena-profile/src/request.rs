use std::future::Future;

use arena_core::CorrelationId;

/// Handle to a request the remote service has acknowledged.
pub trait Submitted {
    type Receipt: Finalized;
    type Error;

    /// Identifier assigned on acknowledgment.
    fn correlation_id(&self) -> CorrelationId;

    /// Resolves once the request reaches a terminal state.
    ///
    /// A failed receipt is still `Ok`; `Err` means the outcome could not be
    /// observed at all.
    fn wait(&self) -> impl Future<Output = Result<Self::Receipt, Self::Error>> + Send;
}

/// Terminal receipt of a submitted request.
pub trait Finalized {
    fn correlation_id(&self) -> CorrelationId;
    fn succeeded(&self) -> bool;
    fn resource_cost(&self) -> Option<u64>;
    fn unit_price(&self) -> Option<u128>;
}
