//! Coarse errors surfaced by [`NetflixClient`](crate::NetflixClient).

use std::fmt;

use netflix_fetch::{ApiError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Orchestration boundary an error was caught at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Login with credentials or a session cookie.
    Login,
    /// Re-resolution of session coordinates.
    Bootstrap,
    /// Profile listing.
    GetProfiles,
    /// Active profile lookup.
    GetActiveProfile,
    /// Profile switch.
    SwitchProfile,
    /// Star or thumb rating.
    SetRating,
    /// Rating history collection.
    GetRatingHistory,
    /// Viewing history collection.
    GetViewingHistory,
    /// Viewing history hiding.
    HideViewingHistory,
    /// Active avatar lookup.
    GetAvatarUrl,
    /// Avatar change.
    SetAvatar,
    /// Catalog browsing.
    Browse,
}

impl Operation {
    /// Returns a short label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Bootstrap => "bootstrap",
            Self::GetProfiles => "get profiles",
            Self::GetActiveProfile => "get active profile",
            Self::SwitchProfile => "switch profile",
            Self::SetRating => "set rating",
            Self::GetRatingHistory => "get rating history",
            Self::GetViewingHistory => "get viewing history",
            Self::HideViewingHistory => "hide viewing history",
            Self::GetAvatarUrl => "get avatar url",
            Self::SetAvatar => "set avatar",
            Self::Browse => "browse",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed client operation.
///
/// The full [`ApiError`] has already gone to the diagnostic sink; this
/// carries only what a caller needs to branch and to show a message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{operation} failed: {message}")]
pub struct NetflixError {
    /// Where the failure was caught.
    pub operation: Operation,
    /// Fieldless kind of the underlying error.
    pub kind: ErrorKind,
    /// Human readable description.
    pub message: String,
}

impl NetflixError {
    /// Collapses an [`ApiError`] caught at `operation`.
    pub fn from_api(operation: Operation, error: &ApiError) -> Self {
        let kind = error.kind();
        let message = match error {
            ApiError::LoginRejected(message) => message.clone(),
            ApiError::Application(code) => format!("{}: {code}", kind.hint()),
            _ => kind.hint().to_string(),
        };
        Self {
            operation,
            kind,
            message,
        }
    }

    /// Returns true if retrying later without user action cannot help.
    pub fn needs_user_action(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InactiveAccount
                | ErrorKind::LoginRejected
                | ErrorKind::TooManyAttemptsOrBadCredentials
                | ErrorKind::NotBootstrapped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_keeps_login_message() {
        let err = NetflixError::from_api(
            Operation::Login,
            &ApiError::LoginRejected("Incorrect password".into()),
        );
        assert_eq!(err.kind, ErrorKind::LoginRejected);
        assert_eq!(err.to_string(), "login failed: Incorrect password");
        assert!(err.needs_user_action());
    }

    #[test]
    fn test_from_api_drops_detail() {
        let err = NetflixError::from_api(
            Operation::GetProfiles,
            &ApiError::mismatch("https://secret/url", "raw payload"),
        );
        assert_eq!(err.kind, ErrorKind::StructuralMismatch);
        assert!(!err.message.contains("secret"));
        assert!(!err.needs_user_action());
    }

    #[test]
    fn test_application_code_is_kept() {
        let err = NetflixError::from_api(Operation::SetAvatar, &ApiError::Application("E42".into()));
        assert!(err.message.ends_with(": E42"));
    }
}
