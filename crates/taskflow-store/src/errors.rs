//! Error handling for taskflow-store
//!
//! Wraps taskflow-core TfError with store-specific helpers

use taskflow_core::errors::{TfError, TfErrorKind};

/// Result type alias using TfError
pub type Result<T> = std::result::Result<T, TfError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> TfError {
    TfError::new(TfErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// An applied migration whose SQL no longer matches what is embedded
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> TfError {
    TfError::new(TfErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
///
/// UNIQUE and PRIMARY KEY violations become `Conflict`; everything else is
/// `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> TfError {
    if let rusqlite::Error::SqliteFailure(ref code, _) = err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation
            && matches!(
                code.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            )
        {
            return TfError::new(TfErrorKind::Conflict)
                .with_op("sqlite")
                .with_message(err.to_string());
        }
    }
    TfError::new(TfErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a cache backend error
pub fn cache_error(operation: &str, err: impl std::fmt::Display) -> TfError {
    TfError::new(TfErrorKind::Cache)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
