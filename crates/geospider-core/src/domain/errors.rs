//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! primarily the range and required-field violations a location sample
//! can carry. Each field gets its own variant so callers (and tests)
//! can distinguish which constraint was violated.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Latitude outside the valid [-90, 90] degree range
    #[error("Latitude must be between -90 and 90 degrees, got {0}")]
    InvalidLatitude(f64),

    /// Longitude outside the valid [-180, 180] degree range
    #[error("Longitude must be between -180 and 180 degrees, got {0}")]
    InvalidLongitude(f64),

    /// Negative accuracy radius
    #[error("Accuracy must be non-negative, got {0}")]
    InvalidAccuracy(f64),

    /// Altitude below any plausible depth
    #[error("Altitude seems unreasonable: {0}")]
    InvalidAltitude(f64),

    /// Negative ground speed
    #[error("Speed must be non-negative, got {0}")]
    InvalidSpeed(f64),

    /// Bearing outside the valid [0, 360] degree range
    #[error("Bearing must be between 0 and 360 degrees, got {0}")]
    InvalidBearing(f64),

    /// Empty or whitespace-only provider name
    #[error("Provider cannot be empty")]
    MissingProvider,

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidLatitude(91.0);
        assert_eq!(
            err.to_string(),
            "Latitude must be between -90 and 90 degrees, got 91"
        );

        let err = DomainError::MissingProvider;
        assert_eq!(err.to_string(), "Provider cannot be empty");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidBearing(361.0);
        let err2 = DomainError::InvalidBearing(361.0);
        let err3 = DomainError::InvalidBearing(-1.0);

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn test_error_clone() {
        let err = DomainError::ValidationFailed("test".to_string());
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
