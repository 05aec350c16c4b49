//! # Boxoffice - theater box-office record imports
//!
//! Boxoffice bulk-loads box-office records (performances, cast, crew,
//! ticket sales, audience feedback) from uploaded CSV files into a
//! record store, reconciling sale and survey rows against existing
//! performances and keeping a provenance audit trail.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ CSV Upload │───▶│  Row Parser │───▶│   Coercion   │───▶│   Importer   │
//! │  (UTF-8)   │    │ (header map)│    │ (typed rows) │    │ (match+store)│
//! └────────────┘    └─────────────┘    └──────────────┘    └──────┬───────┘
//!                                                                 │
//!                                                          ┌──────▼───────┐
//!                                                          │ Audit Record │
//!                                                          └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use boxoffice::{import, ImportKind, ImportRequest, MemoryStorage};
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = MemoryStorage::new();
//!     let request = ImportRequest::new(org_id, production_id, ImportKind::Tickets, "admin");
//!     let outcome = import(&storage, &request, csv_bytes).await.unwrap();
//!     println!("Created {} records", outcome.created);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain records and enumerations
//! - [`parser`] - Row parsing of uploaded files
//! - [`schema`] - Per-type column rules and field coercion
//! - [`matcher`] - Performance resolution by start timestamp
//! - [`importer`] - Import orchestration
//! - [`audit`] - Provenance audit recorder
//! - [`storage`] - Record-storage trait + in-memory implementation
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing & coercion
pub mod parser;
pub mod schema;

// Pipeline
pub mod audit;
pub mod importer;
pub mod matcher;

// Storage seam
pub mod storage;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ImportError, ParseError, RowError, RowFailure, ServerError, StorageError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CastMember, CrewMember, FeedbackEntry, ImportKind, ImportRecord, ImportSource, Performance,
    Production, TicketCategory, TicketSale,
};

// =============================================================================
// Re-exports - Parsing & Coercion
// =============================================================================

pub use parser::{parse_file, parse_rows, Row, RowSet};

pub use schema::{coerce_row, columns, CoercedRow, ColumnRule, FieldKind, FieldValue, TIMESTAMP_FORMAT};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use importer::{import, ImportOutcome, ImportRequest};

pub use matcher::resolve_performance;

pub use audit::record_import;

// =============================================================================
// Re-exports - Storage
// =============================================================================

pub use storage::{MemoryStorage, Storage};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, ImportResponse, ProductionSummary};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
