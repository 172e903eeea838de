//! Client for the authors administration API: transport, cascading delete,
//! and the state behind the listing and creation screens.

pub mod api;
pub mod cascade;
pub mod error;
pub mod fallback;
pub mod transport;
pub mod views;

pub use api::AuthorsApi;
pub use cascade::{CascadeConfig, CascadeDeleter, CascadeError, DeleteOutcome, PutShape};
pub use error::ClientError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
