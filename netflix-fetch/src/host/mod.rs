//! Host APIs for the session client.
//!
//! - [`http`] - Transport trait and the `reqwest` client with a cookie jar
//! - `mock` - Scripted transport for tests (`test-util` feature)

pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

// Re-export key types
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, RequestBody, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;
