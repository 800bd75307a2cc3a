//! Domain models for netflix2.
//!
//! ## Submodules
//!
//! - [`credentials`] - Login input (password or session cookie)
//! - [`profile`] - Account profiles
//! - [`history`] - Rating and viewing history records
//! - [`page`] - Pagination windows and raw page payloads

mod credentials;
mod history;
mod page;
mod profile;

// Re-export everything at the models level
pub use credentials::Credentials;
pub use history::{RatingKind, RatingRecord, ViewingHistoryItem};
pub use page::{PagedResult, RatingHistoryPage, ViewingHistoryPage};
pub use profile::{avatar_id_from_name, Profile, ProfilesResponse};
