//! Import orchestration: parsing, coercion, matching, record creation,
//! counter mutation and the audit hand-off.
//!
//! One invocation processes its rows sequentially in file order. Row
//! failures are tagged: validation failures are recovered (the row is
//! skipped, the error logged, processing continues), storage failures
//! abort the remaining rows while preserving the accumulated count.
//! Win or lose, the audit recorder runs exactly once; the only path
//! without an audit entry is a parse failure, where no row was processed
//! and there is nothing to audit.
//!
//! Re-importing the same file is NOT idempotent: every
//! invocation creates fresh child records and re-applies counter
//! increments. The importer is a passive recorder of what it is given.

use uuid::Uuid;

use crate::api::logs::{log_error, log_info, log_success, log_warning};
use crate::audit;
use crate::error::{ImportResult, RowError, RowFailure, StorageError};
use crate::matcher;
use crate::models::{
    CastMember, CrewMember, FeedbackEntry, ImportKind, ImportRecord, ImportSource, Performance,
    TicketSale,
};
use crate::parser::{self, Row};
use crate::schema;
use crate::storage::Storage;

// =============================================================================
// Request / Outcome
// =============================================================================

/// One import invocation: who is loading what, into which production.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub organization_id: Uuid,
    pub production_id: Uuid,
    pub kind: ImportKind,
    pub source: ImportSource,
    pub imported_by: String,
    /// Name of the stored upload copy, when one was retained.
    pub file_name: Option<String>,
}

impl ImportRequest {
    pub fn new(
        organization_id: Uuid,
        production_id: Uuid,
        kind: ImportKind,
        imported_by: impl Into<String>,
    ) -> Self {
        Self {
            organization_id,
            production_id,
            kind,
            source: ImportSource::Csv,
            imported_by: imported_by.into(),
            file_name: None,
        }
    }

    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// Result of one import invocation.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Records successfully created.
    pub created: usize,
    /// Row-level errors (and the abort entry, if the import was cut
    /// short), in row order.
    pub errors: Vec<String>,
    /// The persisted audit entry.
    pub audit: ImportRecord,
}

impl ImportOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What one row produced.
enum RowOutcome {
    Created,
    /// No matching performance: uncounted, not an error.
    Skipped,
}

// =============================================================================
// Import
// =============================================================================

/// Run one import: decode `bytes`, process every row, persist the audit
/// entry, and report the outcome.
pub async fn import(
    storage: &dyn Storage,
    request: &ImportRequest,
    bytes: &[u8],
) -> ImportResult<ImportOutcome> {
    let rows = parser::parse_rows(bytes)?;
    log_info(format!(
        "Importing {}: {} data rows",
        request.kind.label(),
        rows.len()
    ));

    let mut created = 0usize;
    let mut skipped = 0usize;
    let mut errors: Vec<String> = Vec::new();

    for row in &rows.rows {
        match import_row(storage, request, row).await {
            Ok(RowOutcome::Created) => created += 1,
            Ok(RowOutcome::Skipped) => skipped += 1,
            Err(RowFailure::Validation(err)) => {
                errors.push(format!("line {}: {}", row.line, err));
            }
            Err(RowFailure::Storage(err)) => {
                log_error(format!("line {}: {}, abandoning remaining rows", row.line, err));
                errors.push(format!("line {}: import aborted: {}", row.line, err));
                break;
            }
        }
    }

    if skipped > 0 {
        log_warning(format!("{} rows skipped: no matching performance", skipped));
    }
    if !errors.is_empty() {
        log_warning(format!("{} errors during import", errors.len()));
    }
    log_success(format!("Created {} records", created));

    let audit = audit::record_import(
        storage,
        request.organization_id,
        Some(request.production_id),
        request.source,
        request.kind,
        &request.imported_by,
        created,
        &errors,
        request.file_name.clone(),
    )
    .await?;

    Ok(ImportOutcome {
        created,
        errors,
        audit,
    })
}

/// Process one row according to the import type.
async fn import_row(
    storage: &dyn Storage,
    request: &ImportRequest,
    row: &Row,
) -> Result<RowOutcome, RowFailure> {
    let coerced = schema::coerce_row(request.kind, row)?;

    match request.kind {
        ImportKind::Events => {
            let starts_at = coerced
                .timestamp("date")
                .ok_or_else(|| RowError::missing("date"))?;

            let mut performance = Performance::new(request.production_id, starts_at);
            performance.venue = coerced.text("venue").to_string();
            performance.capacity = coerced.integer("capacity");
            performance.tickets_sold = coerced.integer("tickets_sold");
            performance.revenue = coerced.currency("revenue");
            performance.notes = coerced.text("notes").to_string();

            storage.create_performance(&mut performance).await?;
            Ok(RowOutcome::Created)
        }

        ImportKind::Cast => {
            let mut member = CastMember {
                id: None,
                production_id: request.production_id,
                name: coerced.text("name").to_string(),
                role: coerced.text("role").to_string(),
                email: coerced.text("email").to_string(),
                phone: coerced.text("phone").to_string(),
                order: coerced.integer("order"),
            };

            storage.create_cast_member(&mut member).await?;
            Ok(RowOutcome::Created)
        }

        ImportKind::Crew => {
            let mut member = CrewMember {
                id: None,
                production_id: request.production_id,
                name: coerced.text("name").to_string(),
                position: coerced.text("position").to_string(),
                email: coerced.text("email").to_string(),
                phone: coerced.text("phone").to_string(),
                order: coerced.integer("order"),
            };

            storage.create_crew_member(&mut member).await?;
            Ok(RowOutcome::Created)
        }

        ImportKind::Tickets => {
            let raw = row.get("event_date").unwrap_or("");
            let Some(performance) =
                matcher::resolve_performance(storage, request.production_id, "event_date", raw)
                    .await?
            else {
                return Ok(RowOutcome::Skipped);
            };
            let performance_id = performance
                .id
                .ok_or_else(|| StorageError::backend("performance record has no id"))?;

            let mut sale = TicketSale::new(
                performance_id,
                coerced.category("ticket_type"),
                coerced.currency("price"),
                coerced.integer("quantity"),
            );
            sale.purchaser_name = coerced.text("purchaser_name").to_string();
            sale.purchaser_email = coerced.text("purchaser_email").to_string();

            storage.create_ticket_sale(&mut sale).await?;
            storage
                .add_ticket_totals(performance_id, sale.quantity, sale.total_price())
                .await?;
            Ok(RowOutcome::Created)
        }

        ImportKind::Feedback => {
            let raw = row.get("event_date").unwrap_or("");
            let Some(performance) =
                matcher::resolve_performance(storage, request.production_id, "event_date", raw)
                    .await?
            else {
                return Ok(RowOutcome::Skipped);
            };
            let performance_id = performance
                .id
                .ok_or_else(|| StorageError::backend("performance record has no id"))?;

            let mut entry = FeedbackEntry::new(performance_id, coerced.integer("rating"));
            entry.comments = coerced.text("comments").to_string();
            entry.name = coerced.text("name").to_string();
            entry.email = coerced.text("email").to_string();

            storage.create_feedback(&mut entry).await?;
            Ok(RowOutcome::Created)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
