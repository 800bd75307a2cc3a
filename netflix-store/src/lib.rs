// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # netflix2 Store
//!
//! Configuration and session persistence for netflix2.
//!
//! - **Config**: Service settings, log level, and session file location
//! - **SessionStore**: The session cookie saved after login
//! - **Persistence**: Owner-only JSON file I/O
//!
//! ## Usage
//!
//! ```ignore
//! use netflix_store::{Config, SessionStore};
//!
//! let config = Config::load().await?;
//! let sessions = SessionStore::new(config.session_path());
//! if let Some(saved) = sessions.load().await {
//!     println!("Session from {}", saved.saved_at);
//! }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod session;

pub use config::{Config, LogLevel};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, default_session_path, load_json,
    load_json_or_default, remove_file, save_json,
};
pub use session::{SessionStore, StoredSession};
