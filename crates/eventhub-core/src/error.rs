//! Unified application error types for EventHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Business-rule violations carry a
//! [`ConflictReason`] so callers can tell them apart without parsing
//! messages.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The referenced request, event, or user does not exist.
    NotFound,
    /// A business rule rejected the operation.
    Conflict,
    /// The storage layer aborted the transaction (lock timeout,
    /// serialization failure, deadlock). Safe to retry.
    TransactionConflict,
    /// A query window is malformed (start after end).
    InvalidRange,
    /// Input validation failed.
    Validation,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::TransactionConflict => write!(f, "TRANSACTION_CONFLICT"),
            Self::InvalidRange => write!(f, "INVALID_RANGE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The business rule behind a [`ErrorKind::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictReason {
    /// The event initiator asked to join their own event.
    SelfRequest,
    /// The event is not in the published state.
    EventNotPublished,
    /// A non-canceled request already exists for the (event, requester) pair.
    DuplicateRequest,
    /// Confirming would exceed the participant limit.
    CapacityExceeded,
    /// The caller is not the owner of the event or request.
    NotOwner,
    /// The request cannot be canceled from its current status.
    InvalidTransition,
    /// A moderation batch references a request that is not pending.
    InvalidState,
}

impl ConflictReason {
    /// Return the reason as a stable machine-readable code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfRequest => "SELF_REQUEST",
            Self::EventNotPublished => "EVENT_NOT_PUBLISHED",
            Self::DuplicateRequest => "DUPLICATE_REQUEST",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::NotOwner => "NOT_OWNER",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::InvalidState => "INVALID_STATE",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error used throughout EventHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// The violated business rule, set for [`ErrorKind::Conflict`].
    pub reason: Option<ConflictReason>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reason: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            reason: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a business-rule conflict with its reason.
    pub fn conflict(reason: ConflictReason, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Conflict,
            message: message.into(),
            reason: Some(reason),
            source: None,
        }
    }

    /// Create a retryable storage conflict.
    pub fn transaction_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransactionConflict, message)
    }

    /// Create an invalid-range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRange, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the whole operation may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::TransactionConflict
    }

    /// Whether this error is a business conflict with the given reason.
    pub fn is_conflict(&self, reason: ConflictReason) -> bool {
        self.kind == ErrorKind::Conflict && self.reason == Some(reason)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            reason: self.reason,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_carries_reason() {
        let err = AppError::conflict(ConflictReason::CapacityExceeded, "Limit is reached");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.is_conflict(ConflictReason::CapacityExceeded));
        assert!(!err.is_conflict(ConflictReason::DuplicateRequest));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transaction_conflict_is_retryable() {
        let err = AppError::transaction_conflict("lock timeout");
        assert!(err.is_retryable());
        assert_eq!(err.reason, None);
    }

    #[test]
    fn test_clone_keeps_reason() {
        let err = AppError::conflict(ConflictReason::NotOwner, "User is not the initiator");
        let cloned = err.clone();
        assert_eq!(cloned.reason, Some(ConflictReason::NotOwner));
        assert_eq!(cloned.to_string(), "CONFLICT: User is not the initiator");
    }
}
