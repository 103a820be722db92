//! Sync outcome reporting
//!
//! Result of one sync attempt, returned to the caller and never
//! persisted. A failure outcome can still carry a non-zero synced
//! count: batches delivered before the failing one stay delivered.

use std::fmt;

/// Result of a data synchronization attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Whether the sync attempt succeeded as a whole
    pub success: bool,
    /// Number of samples confirmed delivered during this attempt
    pub synced_count: usize,
    /// Error description when the attempt failed
    pub error_message: Option<String>,
}

impl SyncOutcome {
    /// Creates a successful outcome
    pub fn success(synced_count: usize) -> Self {
        Self {
            success: true,
            synced_count,
            error_message: None,
        }
    }

    /// Creates a failed outcome with no progress
    pub fn failure(message: impl Into<String>) -> Self {
        Self::failure_after(0, message)
    }

    /// Creates a failed outcome that still delivered `synced_count` samples
    /// before hitting the failure
    pub fn failure_after(synced_count: usize, message: impl Into<String>) -> Self {
        Self {
            success: false,
            synced_count,
            error_message: Some(message.into()),
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "synced {} samples", self.synced_count)
        } else {
            write!(
                f,
                "sync failed after {} samples: {}",
                self.synced_count,
                self.error_message.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
