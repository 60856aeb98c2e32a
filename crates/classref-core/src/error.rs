//! Error types and error code constants for classref.
//!
//! All failures raised while querying class references are reported through
//! the single [`ClassRefError`] type. Each variant carries a human-readable
//! message and, when known, the [`Origin`] element the failure is attributed to.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (unresolved reference or visibility)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Unresolved generic parameters are not errors: generic resolution reports
//! them as `None`.

use std::fmt;

use thiserror::Error;

pub use crate::types::Origin;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable numeric codes used for JSON output and CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed unit document).
    InvalidArguments = 2,
    /// Resolution errors (class or visibility could not be resolved).
    ResolutionError = 3,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// ClassRefError
// ============================================================================

/// Structured compilation error raised by class reference queries.
///
/// `Clone` so that memoized views can cache a failure and hand it out again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassRefError {
    /// A visibility level has no canonical counterpart.
    #[error("unresolved visibility: {message}")]
    UnresolvedVisibility {
        message: String,
        origin: Option<Origin>,
    },

    /// A qualified name is unknown to both representations.
    #[error("unresolved reference: {message}")]
    UnresolvedReference {
        message: String,
        origin: Option<Origin>,
    },
}

/// Result type for class reference queries.
pub type ClassRefResult<T> = Result<T, ClassRefError>;

impl ClassRefError {
    pub fn unresolved_visibility(message: impl Into<String>, origin: Option<Origin>) -> Self {
        ClassRefError::UnresolvedVisibility {
            message: message.into(),
            origin,
        }
    }

    pub fn unresolved_reference(message: impl Into<String>, origin: Option<Origin>) -> Self {
        ClassRefError::UnresolvedReference {
            message: message.into(),
            origin,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ClassRefError::UnresolvedVisibility { message, .. }
            | ClassRefError::UnresolvedReference { message, .. } => message,
        }
    }

    /// The element this error is attributed to, if any.
    pub fn origin(&self) -> Option<&Origin> {
        match self {
            ClassRefError::UnresolvedVisibility { origin, .. }
            | ClassRefError::UnresolvedReference { origin, .. } => origin.as_ref(),
        }
    }

    /// Attach an origin, keeping an existing one.
    pub fn or_origin(self, fallback: impl FnOnce() -> Origin) -> Self {
        match self {
            ClassRefError::UnresolvedVisibility { message, origin } => {
                ClassRefError::UnresolvedVisibility {
                    message,
                    origin: origin.or_else(|| Some(fallback())),
                }
            }
            ClassRefError::UnresolvedReference { message, origin } => {
                ClassRefError::UnresolvedReference {
                    message,
                    origin: origin.or_else(|| Some(fallback())),
                }
            }
        }
    }

    /// Stable code for the `error.code` field of JSON responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClassRefError::UnresolvedVisibility { .. } => "unresolved_visibility",
            ClassRefError::UnresolvedReference { .. } => "unresolved_reference",
        }
    }
}

impl From<&ClassRefError> for OutputErrorCode {
    fn from(err: &ClassRefError) -> Self {
        match err {
            ClassRefError::UnresolvedVisibility { .. } => OutputErrorCode::ResolutionError,
            ClassRefError::UnresolvedReference { .. } => OutputErrorCode::ResolutionError,
        }
    }
}
