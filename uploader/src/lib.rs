//! # Bulletin - pricing bulletin upload client
//!
//! Bulletin submits pricing workbooks (`.xlsx`, one sheet per
//! `PROGRAMCODE_PRICINGTYPE`) to the hosted upload function, and turns the
//! row-level validation errors it records into a prioritized summary, a
//! searchable detail list and a CSV report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│   Upload    │────▶│ Error store │────▶│  Classify   │
//! │   (.xlsx)   │     │ (multipart) │     │ (PostgREST) │     │  + report   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │ CSV export  │
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bulletin::{Config, HttpTransport, NoticeCenter, RestErrorStore, StaticSession, UploadOrchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().unwrap();
//!     let auth = Arc::new(StaticSession::from_config(&config));
//!     let mut uploader = UploadOrchestrator::new(
//!         Arc::new(HttpTransport::new(&config)),
//!         Arc::new(RestErrorStore::new(&config, auth.clone())),
//!         auth,
//!         NoticeCenter::new(),
//!     );
//!     let outcome = uploader.upload("bulletin.xlsx".as_ref()).await;
//!     println!("success: {}", outcome.is_success());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Constants and environment configuration
//! - [`models`] - Upload session, error record, error group
//! - [`notice`] - User-facing notices
//! - [`auth`] - Access token provider
//! - [`upload`] - Intake, transport, response interpretation, orchestration
//! - [`store`] - Error record store and fetcher
//! - [`classify`] - Error grouping and prioritization
//! - [`report`] - Summary and detail views
//! - [`export`] - CSV export

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Notices
pub mod notice;

// Session
pub mod auth;

// Upload
pub mod upload;

// Error records
pub mod store;
pub mod classify;

// Presentation
pub mod report;
pub mod export;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AuthError,
    UploadError,
    StoreError,
    ExportError,
    ConfigError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    UploadSession,
    UploadErrorRecord,
    Severity,
    ProcessedErrorGroup,
};

// =============================================================================
// Re-exports - Config and session
// =============================================================================

pub use config::Config;
pub use auth::{AccessToken, AuthProvider, StaticSession};
pub use notice::{Notice, NoticeCenter, NoticeLevel};

// =============================================================================
// Re-exports - Upload
// =============================================================================

pub use upload::{
    HttpTransport,
    UploadTransport,
    RawResponse,
    UploadOrchestrator,
    UploadOutcome,
    UploadState,
    Progress,
    RejectReason,
    user_message,
};

// =============================================================================
// Re-exports - Store and classification
// =============================================================================

pub use store::{ErrorStore, ErrorFetcher, RestErrorStore};
pub use classify::classify_errors;

// =============================================================================
// Re-exports - Presentation
// =============================================================================

pub use report::{DetailView, SummaryView, ExampleChip, render_session};
pub use export::{errors_to_csv, export_errors, export_file_name};
