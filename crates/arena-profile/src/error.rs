use arena_core::CorrelationId;
use thiserror::Error;

/// Profiler failures, generic over the remote service's error type.
#[derive(Debug, Error)]
pub enum ProfileError<E> {
    /// The handle was not issued through this profiler.
    #[error("no pending request for correlation id {0}")]
    UnknownCorrelation(CorrelationId),
    /// The receipt returned for a handle names a different request.
    #[error("receipt for {finalized} does not match issued request {issued}")]
    CorrelationMismatch {
        issued: CorrelationId,
        finalized: CorrelationId,
    },
    #[error("operation failed: {0}")]
    Operation(E),
    #[error("finalization failed: {0}")]
    Finalize(E),
}

#[cfg(test)]
mod tests {
    use super::ProfileError;
    use arena_core::CorrelationId;

    #[test]
    fn messages_are_stable() {
        let err: ProfileError<String> = ProfileError::UnknownCorrelation(CorrelationId([0; 32]));
        assert!(err
            .to_string()
            .starts_with("no pending request for correlation id 0x0000"));
        let err: ProfileError<String> = ProfileError::CorrelationMismatch {
            issued: CorrelationId([1; 32]),
            finalized: CorrelationId([2; 32]),
        };
        assert!(err.to_string().starts_with("receipt for 0x0202"));
        let err = ProfileError::Finalize("dropped".to_string());
        assert_eq!(err.to_string(), "finalization failed: dropped");
    }
}
