//! Error types for the bulletin upload flow.
//!
//! One error enum per component:
//!
//! - [`AuthError`] - Missing or unusable access token
//! - [`UploadError`] - File intake, transport and response interpretation
//! - [`StoreError`] - Backing store queries for error records
//! - [`ExportError`] - CSV export of error records
//! - [`ConfigError`] - Environment configuration
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! component boundaries.

use thiserror::Error;

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors while obtaining a bearer credential.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No active session.
    #[error("Authentication required")]
    Required,

    /// A token exists but cannot be sent as a header.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors raised while submitting a workbook.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File name does not end in `.xlsx`.
    #[error("Unsupported file: {0} (only .xlsx files are accepted)")]
    UnsupportedFile(String),

    /// No bearer credential.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Failed to read the workbook from disk.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a response.
    #[error("Failed to fetch: {0}")]
    Network(String),

    /// Non-2xx response whose body is not a JSON object.
    #[error("{}", http_message(.status, .body))]
    Http { status: u16, body: String },

    /// 2xx response whose body is not an upload result.
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}

fn http_message(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the backing store holding error records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Request could not be sent.
    #[error("Store request failed: {0}")]
    Request(String),

    /// Store answered with a non-2xx status.
    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rows could not be decoded.
    #[error("Failed to decode error records: {0}")]
    Decode(String),

    /// No bearer credential.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while exporting error records to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Re-fetching the records failed.
    #[error("Failed to fetch errors for export: {0}")]
    Store(#[from] StoreError),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the file failed.
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// Base URL is not an http(s) URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
