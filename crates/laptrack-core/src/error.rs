//! # Error Types
//!
//! Domain-specific error types for laptrack-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  laptrack-core errors (this file)                                       │
//! │  ├── CoreError        - Grouping / settlement failures                  │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  laptrack-db errors (separate crate)                                    │
//! │  └── DbError          - Store failures, incl. Consistency               │
//! │                                                                         │
//! │  CLI errors (apps/cli)                                                  │
//! │  └── ApiError         - What the operator sees                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → stderr + exit code      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `ValidationError` is always raised before anything reaches the store,
//! so a failed validation never leaves a partial mutation behind.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No group matched the operator's selection.
    ///
    /// ## When This Occurs
    /// - List position is past the end of the inventory
    /// - Unit id was already sold by an earlier command
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for errors caused by operator input rather than missing data.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount exceeds the accepted maximum, or arithmetic on it would overflow.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: Money },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparsable amount, unknown condition).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
