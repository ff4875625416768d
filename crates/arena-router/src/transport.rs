use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use arena_core::{Address, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One member call addressed to the shared endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub to: Address,
    pub selector: Selector,
    /// Encoded arguments, without the selector.
    pub data: Vec<u8>,
}

impl CallRequest {
    /// Selector followed by the encoded arguments.
    pub fn calldata(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Selector::LEN + self.data.len());
        out.extend_from_slice(&self.selector.0);
        out.extend_from_slice(&self.data);
        out
    }
}

/// Connection to the remote endpoint shared by the primary interface and
/// every facet handle.
pub trait Transport: Send + Sync {
    type Error: std::fmt::Display;

    fn call(
        &self,
        request: CallRequest,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InMemoryTransportError {
    #[error("no response registered for selector {0}")]
    NoResponse(Selector),
}

/// In-memory transport for tests and simulations: records every request and
/// answers from a per-selector response table.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    calls: Mutex<Vec<CallRequest>>,
    responses: Mutex<HashMap<Selector, Vec<u8>>>,
}

impl InMemoryTransport {
    pub fn set_response(&self, selector: Selector, response: Vec<u8>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(selector, response);
    }

    /// Drains and returns all requests seen so far.
    pub fn take_calls(&self) -> Vec<CallRequest> {
        std::mem::take(&mut *self.calls.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Transport for InMemoryTransport {
    type Error = InMemoryTransportError;

    async fn call(&self, request: CallRequest) -> Result<Vec<u8>, Self::Error> {
        let selector = request.selector;
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&selector)
            .cloned()
            .ok_or(InMemoryTransportError::NoResponse(selector))
    }
}

#[cfg(test)]
mod tests {
    use super::{CallRequest, InMemoryTransport, InMemoryTransportError, Transport};
    use arena_core::{Address, Selector};

    #[tokio::test]
    async fn records_calls_and_replays_responses() {
        let transport = InMemoryTransport::default();
        let selector = Selector([1, 2, 3, 4]);
        transport.set_response(selector, vec![9, 9]);

        let request = CallRequest {
            to: Address([0x11; 20]),
            selector,
            data: vec![7],
        };
        assert_eq!(request.calldata(), vec![1, 2, 3, 4, 7]);

        let out = transport.call(request.clone()).await.expect("response registered");
        assert_eq!(out, vec![9, 9]);

        let missing = CallRequest {
            selector: Selector([0; 4]),
            ..request.clone()
        };
        let err = transport.call(missing).await.expect_err("no response");
        assert_eq!(err, InMemoryTransportError::NoResponse(Selector([0; 4])));

        let calls = transport.take_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], request);
        assert!(transport.take_calls().is_empty());
    }
}
