//! Classification of sqlx errors into [`AppError`] kinds.
//!
//! Lock timeouts, serialization failures and deadlocks abort the
//! surrounding transaction and are reported as retryable
//! [`ErrorKind::TransactionConflict`]. A violation of the live-request
//! unique index is the storage-level duplicate guard and maps to the
//! business conflict it stands for.

use eventhub_core::error::{AppError, ConflictReason, ErrorKind};

/// `lock_not_available`, raised when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";
/// `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";
/// `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Name of the partial unique index over non-canceled requests.
pub const LIVE_REQUEST_INDEX: &str = "uq_participation_requests_live";

/// Map a sqlx error, attaching `context` to the message.
pub fn classify(context: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(LOCK_NOT_AVAILABLE | SERIALIZATION_FAILURE | DEADLOCK_DETECTED) => {
                return AppError::with_source(
                    ErrorKind::TransactionConflict,
                    format!("{context}: transaction aborted, retry the operation"),
                    err,
                );
            }
            Some(UNIQUE_VIOLATION) if db.constraint() == Some(LIVE_REQUEST_INDEX) => {
                let mut conflict =
                    AppError::conflict(ConflictReason::DuplicateRequest, "Request already exists");
                conflict.source = Some(Box::new(err));
                return conflict;
            }
            _ => {}
        }
    }

    AppError::with_source(ErrorKind::Database, format!("{context}: {err}"), err)
}

/// Closure form of [`classify`] for `map_err`.
pub fn map_sqlx(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| classify(context, err)
}
