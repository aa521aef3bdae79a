//! Error types for the session crate.
//!
//! - `MalformedTokenError`: a token string could not be decoded into claims
//! - `SessionError`: why a session ended (all variants except
//!   `IdentityFetchFailed` are terminal and force a logout)
//! - `IdentityError`: failures talking to the identity service

use std::fmt;

/// A token could not be parsed into the expected claim shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTokenError {
    reason: String,
}

impl MalformedTokenError {
    /// Creates a new error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns why the token was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for MalformedTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed token: {}", self.reason)
    }
}

impl std::error::Error for MalformedTokenError {}

/// Reasons a session ends or degrades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No access token is stored.
    NoCredential,
    /// The stored access token could not be decoded.
    MalformedToken { reason: String },
    /// The access token is past its expiry and no refresh token is available.
    ExpiredToken,
    /// The identity service refused to issue a new access token.
    RefreshRejected { reason: String },
    /// The identity service could not resolve the token into a profile.
    IdentityFetchFailed { reason: String },
}

impl SessionError {
    /// Returns true if this error ends the session (token cleared, redirect to login).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::IdentityFetchFailed { .. })
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredential => write!(f, "no credential stored"),
            Self::MalformedToken { reason } => write!(f, "malformed token: {reason}"),
            Self::ExpiredToken => write!(f, "access token expired and no refresh token available"),
            Self::RefreshRejected { reason } => write!(f, "token refresh rejected: {reason}"),
            Self::IdentityFetchFailed { reason } => {
                write!(f, "identity fetch failed: {reason}")
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl From<MalformedTokenError> for SessionError {
    fn from(err: MalformedTokenError) -> Self {
        Self::MalformedToken { reason: err.reason }
    }
}

/// Errors from identity service calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The configured service URL is invalid.
    InvalidUrl { details: String },
    /// The request could not be sent or the connection failed.
    Transport { details: String },
    /// The service answered with a non-success status.
    Status { status: u16 },
    /// The response body did not have the expected shape.
    InvalidBody { details: String },
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { details } => write!(f, "invalid identity service url: {details}"),
            Self::Transport { details } => {
                write!(f, "identity service request failed: {details}")
            }
            Self::Status { status } => {
                write!(f, "identity service responded with status {status}")
            }
            Self::InvalidBody { details } => {
                write!(f, "invalid identity service response: {details}")
            }
        }
    }
}

impl std::error::Error for IdentityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_token_display() {
        let err = MalformedTokenError::new("expected three segments");
        assert!(err.to_string().contains("malformed token"));
        assert!(err.to_string().contains("expected three segments"));
    }

    #[test]
    fn malformed_token_converts_to_session_error() {
        let err: SessionError = MalformedTokenError::new("bad payload").into();
        assert_eq!(
            err,
            SessionError::MalformedToken {
                reason: "bad payload".to_string()
            }
        );
    }

    #[test]
    fn only_identity_fetch_failure_is_recoverable() {
        assert!(SessionError::NoCredential.is_terminal());
        assert!(SessionError::ExpiredToken.is_terminal());
        assert!(
            SessionError::RefreshRejected {
                reason: "401".to_string()
            }
            .is_terminal()
        );
        assert!(
            !SessionError::IdentityFetchFailed {
                reason: "timeout".to_string()
            }
            .is_terminal()
        );
    }

    #[test]
    fn identity_error_status_display() {
        let err = IdentityError::Status { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
