//! CLI command implementations.

pub mod avatar;
pub mod browse;
pub mod config;
pub mod history;
pub mod login;
pub mod profiles;
pub mod ratings;
mod session;
