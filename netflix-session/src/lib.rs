// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # netflix2 Session
//!
//! Login, bootstrap, and the account operations of the netflix2 client.
//!
//! - [`flow`] - The login/bootstrap state machine ([`AuthFlow`])
//! - [`form`] - Login form serialization and rejection messages
//! - [`diagnostics`] - Where caught failures are reported in full
//! - [`NetflixClient`] - Profiles, ratings, viewing history, avatars, browsing
//!
//! ## Usage
//!
//! ```ignore
//! use netflix_core::Credentials;
//! use netflix_fetch::ServiceConfig;
//! use netflix_session::NetflixClient;
//!
//! let client = NetflixClient::new(ServiceConfig::default())?;
//! client.login(&Credentials::password("user@example.com", "secret")).await?;
//!
//! for profile in client.get_profiles().await? {
//!     println!("{} {}", profile.guid, profile.display_name);
//! }
//! ```

pub mod client;
pub mod diagnostics;
pub mod error;
pub mod flow;
pub mod form;

#[cfg(test)]
mod fixtures;

// Re-export key types
pub use client::{avatar_url, NetflixClient, DEFAULT_AVATAR_SIZE};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{NetflixError, Operation};
pub use flow::{AuthFlow, AuthState};
pub use form::LoginForm;
