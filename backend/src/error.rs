//! Error types for the Boxoffice import pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ParseError`] - upload decoding / row parsing errors (fatal, pre-row)
//! - [`RowError`] - per-row validation errors (recovered, logged per row)
//! - [`StorageError`] - record-storage collaborator errors
//! - [`RowFailure`] - tagged outcome of one row (validation vs storage)
//! - [`ImportError`] - top-level import orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Parse Errors (fatal, before any row is processed)
// =============================================================================

/// Errors while decoding the uploaded byte stream into rows.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Upload is not decodable as UTF-8 text.
    #[error("Upload is not valid UTF-8 text: {0}")]
    MalformedInput(String),

    /// Empty file.
    #[error("Uploaded file is empty")]
    EmptyFile,

    /// Header line present but names no columns.
    #[error("No column headers found")]
    NoHeaders,

    /// Failed to read the input.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Row Errors (recovered per row)
// =============================================================================

/// Per-row validation errors. These never abort an import: the row is
/// skipped, the error is appended to the import's error list, and
/// processing continues with the next row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowError {
    /// A required column is absent from the header or blank in the row.
    #[error("missing required column '{column}'")]
    MissingField { column: String },

    /// A field value does not convert to its declared type.
    #[error("column '{column}' (value '{value}'): {message}")]
    FieldFormat {
        column: String,
        value: String,
        message: String,
    },
}

impl RowError {
    pub fn missing(column: impl Into<String>) -> Self {
        Self::MissingField {
            column: column.into(),
        }
    }

    pub fn format(
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::FieldFormat {
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by the record-storage collaborator.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Referenced record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Backend failure (connection, constraint, timeout, ...).
    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

impl StorageError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

// =============================================================================
// Row Failure (tagged)
// =============================================================================

/// Outcome of processing one row, tagged by failure class so the importer
/// can decide whether to continue or abort the remaining rows.
#[derive(Debug, Error)]
pub enum RowFailure {
    /// Validation failure: recovered, the import continues.
    #[error("{0}")]
    Validation(#[from] RowError),

    /// Storage failure: aborts the remaining rows, partial count preserved.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level import orchestration errors.
///
/// This is the error type returned by [`crate::importer::import`].
/// Anything recoverable (bad rows, a storage abort mid-file) is reported
/// inside the import outcome instead; only failures that leave nothing to
/// audit (pre-row parse) or that lose the audit itself surface here.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Upload could not be decoded into rows. Nothing was created and no
    /// audit entry is written.
    #[error("Import aborted: {0}")]
    Parse(#[from] ParseError),

    /// Persisting the audit entry failed. The audit trail is part of the
    /// operation's definition of success, so this is terminal.
    #[error("Import completed but the audit entry could not be written: {0}")]
    Audit(StorageError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Import pipeline error.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Storage error outside an import (summary queries, lookups).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for per-row coercion.
pub type RowResult<T> = Result<T, RowError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display() {
        let err = RowError::format("date", "tomorrow", "expected YYYY-MM-DD HH:MM");
        let msg = err.to_string();
        assert!(msg.contains("column 'date'"));
        assert!(msg.contains("value 'tomorrow'"));
        assert!(msg.contains("expected YYYY-MM-DD HH:MM"));

        let err = RowError::missing("name");
        assert_eq!(err.to_string(), "missing required column 'name'");
    }

    #[test]
    fn test_error_conversion_chain() {
        // RowError -> RowFailure
        let failure: RowFailure = RowError::missing("date").into();
        assert!(matches!(failure, RowFailure::Validation(_)));

        // StorageError -> RowFailure
        let failure: RowFailure = StorageError::backend("connection reset").into();
        assert!(failure.to_string().contains("storage failure"));

        // ParseError -> ImportError
        let import_err: ImportError = ParseError::EmptyFile.into();
        assert!(import_err.to_string().contains("empty"));
    }

    #[test]
    fn test_audit_error_is_distinct() {
        let err = ImportError::Audit(StorageError::backend("disk full"));
        assert!(err.to_string().contains("audit entry"));
        assert!(err.to_string().contains("disk full"));
    }
}
