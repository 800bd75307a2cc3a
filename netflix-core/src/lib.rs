// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # netflix2 Core
//!
//! Core types, models, and traits shared by every netflix2 crate.
//!
//! The models here are read-only projections of the JSON the Netflix web
//! API returns. Field names follow the upstream camelCase payloads; any
//! field we do not model explicitly is preserved in an `extra` map so the
//! projection never silently drops data.
//!
//! ## Key Types
//!
//! ### Session Input
//! - [`Credentials`] - Email/password pair or a pre-established session cookie
//!
//! ### Account Data
//! - [`Profile`] - A profile of the signed-in account
//! - [`RatingRecord`] - One entry of the rating history
//! - [`ViewingHistoryItem`] - One entry of the viewing activity
//!
//! ### Pagination
//! - [`PagedResult`] - One page window of a paginated resource
//! - [`RatingHistoryPage`] / [`ViewingHistoryPage`] - Raw upstream page payloads
//! - [`PageResponse`] - Normalizes a raw page into a [`PagedResult`]

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Session input
    Credentials,
    // Account data
    Profile,
    ProfilesResponse,
    avatar_id_from_name,
    RatingKind,
    RatingRecord,
    ViewingHistoryItem,
    // Pagination
    PagedResult,
    RatingHistoryPage,
    ViewingHistoryPage,
};

// Re-export traits
pub use traits::PageResponse;
