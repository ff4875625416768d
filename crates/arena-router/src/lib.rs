//! Dynamic facet router for modular arena endpoints.
//!
//! One logical endpoint is served by a primary interface plus several
//! independently deployed facets that share its address. The router resolves
//! member names and event topics to whichever interface defines them and
//! memoizes each answer permanently.

pub mod error;
pub mod event;
pub mod handle;
pub mod interface;
pub mod manifest;
pub mod router;
pub mod transport;

pub use error::{CallError, InterfaceError, ManifestError, RouterError};
pub use event::{EventFilter, FilterConstructor, LogEvent};
pub use handle::FacetHandle;
pub use interface::{
    encode_selector_array, EventFragment, FacetInterface, FunctionFragment, Param,
};
pub use manifest::{EndpointManifest, FacetEntry};
pub use router::{Binding, FacetRouter, NativeOp, Target};
pub use transport::{CallRequest, InMemoryTransport, Transport};
