//! Login credentials.

use std::fmt;

use crate::error::CoreError;

/// How a session is established.
///
/// Credentials are immutable once handed to a client. The password and
/// cookie values are redacted from `Debug` output so they never reach a
/// log line by accident.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Account email and password, submitted through the login form.
    Password {
        /// Account email or phone number (`userLoginId` form field).
        email: String,
        /// Account password.
        password: String,
    },
    /// An opaque `Cookie` header value from a previous login.
    SessionCookie(String),
}

impl Credentials {
    /// Creates email/password credentials.
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Creates credentials from a stored session cookie string.
    pub fn session_cookie(cookie: impl Into<String>) -> Self {
        Self::SessionCookie(cookie.into())
    }

    /// Returns true if these credentials skip the login form.
    pub fn is_session_cookie(&self) -> bool {
        matches!(self, Self::SessionCookie(_))
    }

    /// Rejects credentials that cannot possibly log in.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Password { email, password } => {
                if email.trim().is_empty() {
                    return Err(CoreError::EmptyField("email"));
                }
                if password.is_empty() {
                    return Err(CoreError::EmptyField("password"));
                }
                Ok(())
            }
            Self::SessionCookie(cookie) if cookie.trim().is_empty() => {
                Err(CoreError::EmptyField("cookie"))
            }
            Self::SessionCookie(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Self::SessionCookie(_) => f.debug_tuple("SessionCookie").field(&"<redacted>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::password("user@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("hunter2"));

        let cookie = Credentials::session_cookie("NetflixId=secret");
        assert!(!format!("{cookie:?}").contains("secret"));
    }

    #[test]
    fn test_is_session_cookie() {
        assert!(Credentials::session_cookie("a=b").is_session_cookie());
        assert!(!Credentials::password("a", "b").is_session_cookie());
    }

    #[test]
    fn test_validate() {
        assert!(Credentials::password("a@b.c", "pw").validate().is_ok());
        assert_eq!(
            Credentials::password("", "pw").validate(),
            Err(CoreError::EmptyField("email"))
        );
        assert_eq!(
            Credentials::password("a@b.c", "").validate(),
            Err(CoreError::EmptyField("password"))
        );
        // Phone numbers are valid login ids.
        assert!(Credentials::password("+15551234567", "pw").validate().is_ok());
        assert_eq!(
            Credentials::session_cookie("  ").validate(),
            Err(CoreError::EmptyField("cookie"))
        );
    }
}
