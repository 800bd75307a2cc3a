//! Error types for transport and API operations.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Transport Error
// ============================================================================

/// Failure of the underlying HTTP transport.
///
/// Transport failures are surfaced as-is; nothing in this crate retries.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request error reported by the HTTP client.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid cookie string.
    #[error("Invalid cookie: {0}")]
    InvalidCookie(String),

    /// Any other transport-level failure.
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// API Error
// ============================================================================

/// Error taxonomy for bootstrap, login, and API calls.
///
/// Each variant carries enough data to log the root cause. Callers of the
/// high-level client only ever see the coarse [`ErrorKind`] of these.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unexpected HTTP status.
    #[error("HTTP {status}: {status_text}")]
    Http {
        /// Status code.
        status: u16,
        /// Canonical reason phrase.
        status_text: String,
    },

    /// Bootstrap state did not match any known schema variant.
    #[error("Unrecognized bootstrap state from {url}: {detail}")]
    StructuralMismatch {
        /// Bootstrap URL that produced the state.
        url: String,
        /// What was missing or malformed.
        detail: String,
    },

    /// The account is not a current member.
    #[error("Account is not an active member")]
    InactiveAccount,

    /// Bootstrap state carries no member/profile context.
    #[error("Bootstrap state has no member context")]
    MissingProfile,

    /// The login form was rejected.
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    /// The login page itself was refused (HTTP 403).
    #[error("Too many login attempts or bad credentials")]
    TooManyAttemptsOrBadCredentials,

    /// HTTP 500 carrying a structured upstream error code.
    #[error("Application error: {0}")]
    Application(String),

    /// An echoed mutation result disagrees with the request.
    #[error("Inconsistent result: expected {expected}, got {actual}")]
    Consistency {
        /// Value that was requested.
        expected: String,
        /// Value the server echoed.
        actual: String,
    },

    /// Network failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// An API call was attempted before the API root was known.
    #[error("Session is not bootstrapped")]
    NotBootstrapped,

    /// A successful response whose body could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Creates an HTTP error from a status code and reason phrase.
    pub fn http(status: u16, status_text: impl Into<String>) -> Self {
        Self::Http {
            status,
            status_text: status_text.into(),
        }
    }

    /// Creates a structural mismatch error.
    pub fn mismatch(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            url: url.into(),
            detail: detail.into(),
        }
    }

    /// Creates a consistency error.
    pub fn consistency(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::Consistency {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Returns the fieldless kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http { .. } => ErrorKind::Http,
            Self::StructuralMismatch { .. } => ErrorKind::StructuralMismatch,
            Self::InactiveAccount => ErrorKind::InactiveAccount,
            Self::MissingProfile => ErrorKind::MissingProfile,
            Self::LoginRejected(_) => ErrorKind::LoginRejected,
            Self::TooManyAttemptsOrBadCredentials => ErrorKind::TooManyAttemptsOrBadCredentials,
            Self::Application(_) => ErrorKind::Application,
            Self::Consistency { .. } => ErrorKind::Consistency,
            Self::Transport(_) => ErrorKind::Transport,
            Self::NotBootstrapped => ErrorKind::NotBootstrapped,
            Self::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidResponse(e.to_string())
    }
}

// ============================================================================
// Error Kind
// ============================================================================

/// Fieldless mirror of [`ApiError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ApiError::Http`].
    Http,
    /// See [`ApiError::StructuralMismatch`].
    StructuralMismatch,
    /// See [`ApiError::InactiveAccount`].
    InactiveAccount,
    /// See [`ApiError::MissingProfile`].
    MissingProfile,
    /// See [`ApiError::LoginRejected`].
    LoginRejected,
    /// See [`ApiError::TooManyAttemptsOrBadCredentials`].
    TooManyAttemptsOrBadCredentials,
    /// See [`ApiError::Application`].
    Application,
    /// See [`ApiError::Consistency`].
    Consistency,
    /// See [`ApiError::Transport`].
    Transport,
    /// See [`ApiError::NotBootstrapped`].
    NotBootstrapped,
    /// See [`ApiError::InvalidResponse`].
    InvalidResponse,
}

impl ErrorKind {
    /// Short user-facing hint for this kind of failure.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Http => "the service answered with an unexpected status",
            Self::StructuralMismatch => "the service changed its page layout; an update is needed",
            Self::InactiveAccount => "the account has no active membership",
            Self::MissingProfile => "no profile is selected for this account",
            Self::LoginRejected => "the service rejected the login",
            Self::TooManyAttemptsOrBadCredentials => {
                "too many login attempts or wrong credentials; wait before retrying"
            }
            Self::Application => "the service reported an application error",
            Self::Consistency => "the service did not apply the change as requested",
            Self::Transport => "the service could not be reached",
            Self::NotBootstrapped => "log in before calling the API",
            Self::InvalidResponse => "the service returned an unreadable response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hint())
    }
}
