use std::sync::Arc;

use arena_core::Address;

use crate::error::CallError;
use crate::interface::FacetInterface;
use crate::transport::{CallRequest, Transport};

/// One interface bound to the shared endpoint address and transport.
#[derive(Debug)]
pub struct FacetHandle<T> {
    name: String,
    address: Address,
    interface: Arc<FacetInterface>,
    transport: Arc<T>,
}

impl<T> Clone for FacetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            address: self.address,
            interface: Arc::clone(&self.interface),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> FacetHandle<T> {
    pub fn new(
        name: impl Into<String>,
        address: Address,
        interface: FacetInterface,
        transport: Arc<T>,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            interface: Arc::new(interface),
            transport,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn interface(&self) -> &FacetInterface {
        &self.interface
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub(crate) fn set_interface(&mut self, interface: FacetInterface) {
        self.interface = Arc::new(interface);
    }

    /// Builds the request for `member`, or `None` when this interface does
    /// not define it.
    pub fn call_request(&self, member: &str, data: Vec<u8>) -> Option<CallRequest> {
        let function = self.interface.function(member)?;
        Some(CallRequest {
            to: self.address,
            selector: function.selector,
            data,
        })
    }
}

impl<T: Transport> FacetHandle<T> {
    /// Forwards a member call through the shared transport.
    pub async fn call(&self, member: &str, data: Vec<u8>) -> Result<Vec<u8>, CallError<T::Error>> {
        let request = self
            .call_request(member, data)
            .ok_or_else(|| CallError::UnknownMember(member.to_string()))?;
        tracing::debug!(
            facet = %self.name,
            member,
            selector = %request.selector,
            "forwarding member call"
        );
        self.transport
            .call(request)
            .await
            .map_err(CallError::Transport)
    }
}
