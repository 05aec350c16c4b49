//! REST API types for admin clients.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::importer::ImportOutcome;
use crate::models::{FeedbackEntry, Performance};

/// Response sent to the client after a CSV upload was imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Status: "ready" (clean) or "warning" (rows failed)
    pub status: String,

    /// Records successfully created
    pub created: usize,

    /// Number of row-level errors (details live in the audit record)
    pub error_count: usize,

    /// Id of the persisted audit entry
    pub audit_id: Option<Uuid>,

    /// Primary user-facing message
    pub message: String,

    /// Secondary warning, present when rows failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<ImportOutcome> for ImportResponse {
    fn from(outcome: ImportOutcome) -> Self {
        let error_count = outcome.errors.len();

        ImportResponse {
            status: if error_count == 0 { "ready" } else { "warning" }.to_string(),
            created: outcome.created,
            error_count,
            audit_id: outcome.audit.id,
            message: format!("Imported {} records successfully.", outcome.created),
            warning: (error_count > 0)
                .then(|| format!("{} errors occurred during import.", error_count)),
        }
    }
}

/// Aggregate totals for one production, recomputed on demand from its
/// stored performances and feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSummary {
    pub production_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub performance_count: usize,
    pub total_capacity: i64,
    pub total_tickets_sold: i64,
    pub total_revenue: Decimal,
    /// Tickets sold over capacity, as a percentage (0 with no capacity).
    pub attendance_rate: f64,
    /// Mean feedback rating (0 with no feedback).
    pub average_rating: f64,
}

impl ProductionSummary {
    pub fn from_records(
        production_id: Uuid,
        title: Option<String>,
        performances: &[Performance],
        feedback: &[FeedbackEntry],
    ) -> Self {
        let total_capacity: i64 = performances.iter().map(|p| p.capacity).sum();
        let total_tickets_sold: i64 = performances.iter().map(|p| p.tickets_sold).sum();
        let total_revenue: Decimal = performances.iter().map(|p| p.revenue).sum();

        let attendance_rate = if total_capacity > 0 {
            (total_tickets_sold as f64 / total_capacity as f64) * 100.0
        } else {
            0.0
        };

        let average_rating = if feedback.is_empty() {
            0.0
        } else {
            feedback.iter().map(|f| f.rating as f64).sum::<f64>() / feedback.len() as f64
        };

        ProductionSummary {
            production_id,
            title,
            performance_count: performances.len(),
            total_capacity,
            total_tickets_sold,
            total_revenue,
            attendance_rate,
            average_rating,
        }
    }
}

/// Create an error response body
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
        "created": 0,
        "errorCount": 0,
    })
}
