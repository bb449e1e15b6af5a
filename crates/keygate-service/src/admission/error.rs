//! Admission outcomes that deny a request.

use thiserror::Error;

/// Coarse classification used to pick the HTTP status of a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required field is missing.
    Validation,
    /// The credential is unknown, suspended or expired.
    Auth,
    /// The key's concurrency cap is reached.
    Capacity,
    /// A store failed.
    Internal,
}

/// Why a connect or disconnect was refused.
///
/// `Display` yields the client-facing reason string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Connect without `user_key`.
    #[error("License key required")]
    KeyRequired,
    /// Connect without `serial`.
    #[error("Hardware ID required")]
    HwidRequired,
    /// No key matches the credential by secret or by name.
    #[error("Invalid license key")]
    InvalidKey,
    /// Key status is anything other than active.
    #[error("License key is suspended")]
    KeySuspended,
    /// Key passed its expiry; it has been flipped to `expired`.
    #[error("License key has expired")]
    KeyExpired,
    /// A new occupant would exceed the cap carried here.
    #[error("Maximum users limit reached ({0})")]
    MaxUsersReached(i32),
    /// Disconnect without `user_key` or `serial`.
    #[error("License key and hardware ID required")]
    MissingParameters,
    /// Store failure. Details go to operational logs only.
    #[error("Internal server error")]
    Internal,
}

impl AdmissionError {
    /// Classification of this denial.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::KeyRequired | Self::HwidRequired | Self::MissingParameters => {
                ErrorCategory::Validation
            }
            Self::InvalidKey | Self::KeySuspended | Self::KeyExpired => ErrorCategory::Auth,
            Self::MaxUsersReached(_) => ErrorCategory::Capacity,
            Self::Internal => ErrorCategory::Internal,
        }
    }

    /// Outcome string written to the audit trail.
    pub fn audit_response(&self) -> &'static str {
        match self {
            Self::KeyRequired => "error: key required",
            Self::HwidRequired => "error: hwid required",
            Self::InvalidKey => "error: invalid key",
            Self::KeySuspended => "error: key not active",
            Self::KeyExpired => "error: key expired",
            Self::MaxUsersReached(_) => "error: max users reached",
            Self::MissingParameters => "error: missing parameters",
            Self::Internal => "error: internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            AdmissionError::MaxUsersReached(3).to_string(),
            "Maximum users limit reached (3)"
        );
        assert_eq!(
            AdmissionError::KeySuspended.to_string(),
            "License key is suspended"
        );
        assert_eq!(
            AdmissionError::MissingParameters.to_string(),
            "License key and hardware ID required"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(AdmissionError::HwidRequired.category(), ErrorCategory::Validation);
        assert_eq!(AdmissionError::KeyExpired.category(), ErrorCategory::Auth);
        assert_eq!(
            AdmissionError::MaxUsersReached(1).category(),
            ErrorCategory::Capacity
        );
        assert_eq!(AdmissionError::Internal.category(), ErrorCategory::Internal);
    }
}
