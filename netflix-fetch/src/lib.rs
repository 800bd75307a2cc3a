// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # netflix2 Fetch
//!
//! Transport, bootstrap state extraction, and the JSON API gateway.
//!
//! The service publishes no stable API. Its coordinates (API root, endpoint
//! identifiers, auth tokens) are embedded in server-rendered pages and
//! change between deployments, so every session rediscovers them.
//!
//! ## Host APIs
//!
//! - [`host::http`] - [`Transport`] trait and the `reqwest`-backed [`HttpClient`]
//! - `host::mock` - Scripted `MockTransport` (`test-util` feature)
//!
//! ## Bootstrap
//!
//! - [`extract::HtmlContextExtractor`] - Inline state scripts to a namespace tree
//! - [`resolver::SessionContextResolver`] - Namespace tree to session coordinates
//! - [`context::SessionContext`] - The discovered coordinates
//!
//! ## API Calls
//!
//! - [`gateway::ApiGateway`] - Request building, execution, failure classification
//! - [`pagination::collect_pages`] - Ordered paged collection
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use netflix_fetch::{ApiGateway, Endpoint, HttpClient, RequestOptions, ServiceConfig};
//!
//! let config = ServiceConfig::default();
//! let transport = Arc::new(HttpClient::new(&config)?);
//! let gateway = ApiGateway::new(transport, config);
//!
//! // `context` comes from bootstrapping
//! let profiles = gateway.call(&context, Endpoint::Profiles, RequestOptions::new()).await?;
//! ```

// Core modules
pub mod context;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod host;
pub mod pagination;
pub mod resolver;
pub mod settings;

// Re-export key types at crate root

// Errors
pub use error::{ApiError, ErrorKind, TransportError};

// Host APIs
pub use host::http::{HttpClient, HttpRequest, HttpResponse, Method, RequestBody, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use host::mock::MockTransport;

// Bootstrap
pub use context::{ResolvedContext, SessionContext};
pub use extract::{HtmlContextExtractor, LiteralError, NamespaceTree, STATE_SCRIPT_PREFIX};
pub use resolver::{SchemaVariant, SessionContextResolver};
pub use settings::{BootstrapPage, ServiceConfig, ServiceConfigBuilder};

// API calls
pub use gateway::{classify_response, ApiGateway, ApiRequest, Endpoint, RequestOptions};
pub use pagination::collect_pages;
