//! Network layer - request building, dispatch, and the send actor
//!
//! The Network actor receives send commands and reports outcomes back
//! in completion order.

pub mod actor;
pub mod client;
pub mod executor;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use actor::NetworkActor;
pub use client::ReqwestTransport;
pub use executor::{build_wire_request, RequestExecutor};
pub use transport::{BoxFuture, Transport, WireRequest, WireResponse};
