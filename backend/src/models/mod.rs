//! Domain models for the Boxoffice import pipeline.
//!
//! This module contains the record types flowing through the pipeline:
//!
//! - [`Production`] - a show spanning one or more performances
//! - [`Performance`] - one scheduled occurrence of a production
//! - [`TicketSale`] / [`TicketCategory`] - individual sale records
//! - [`FeedbackEntry`] - audience survey responses
//! - [`CastMember`] / [`CrewMember`] - production members
//! - [`ImportRecord`] / [`ImportKind`] / [`ImportSource`] - audit trail
//!
//! Records carry `id: Option<Uuid>`; the storage layer assigns the id on
//! create.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Production
// =============================================================================

/// A theatrical show entity owned by one organization.
///
/// The import pipeline only references productions; it never creates or
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Production {
    pub id: Option<Uuid>,
    pub organization_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Production {
    pub fn new(organization_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: None,
            organization_id,
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Performance
// =============================================================================

/// One scheduled dated/timed occurrence of a production.
///
/// Identity is (production reference, exact start timestamp). The
/// tickets-sold counter and revenue accumulator only ever grow as sale
/// imports are applied, and both may legitimately exceed capacity:
/// over-sell is recorded, not rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performance {
    pub id: Option<Uuid>,
    pub production_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub venue: String,
    pub capacity: i64,
    pub tickets_sold: i64,
    pub revenue: Decimal,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Performance {
    /// New performance with zeroed counters.
    pub fn new(production_id: Uuid, starts_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            production_id,
            starts_at,
            venue: String::new(),
            capacity: 0,
            tickets_sold: 0,
            revenue: Decimal::ZERO,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Tickets sold as a percentage of capacity (0 when capacity is 0).
    pub fn attendance_percentage(&self) -> f64 {
        if self.capacity > 0 {
            (self.tickets_sold as f64 / self.capacity as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Seats still available, floored at zero under over-sell.
    pub fn tickets_remaining(&self) -> i64 {
        (self.capacity - self.tickets_sold).max(0)
    }
}

// =============================================================================
// Ticket Category
// =============================================================================

/// Pricing category of a ticket sale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TicketCategory {
    #[default]
    FullPrice,
    Concession,
    Senior,
    Minor,
    Complimentary,
}

impl TicketCategory {
    /// Parse a category code, accepting legacy aliases.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_lowercase();
        match normalized.as_str() {
            "full-price" | "full" | "adult" => Some(Self::FullPrice),
            "concession" | "concession-age" | "student" => Some(Self::Concession),
            "senior" => Some(Self::Senior),
            "minor" | "child" => Some(Self::Minor),
            "complimentary" | "comp" => Some(Self::Complimentary),
            _ => None,
        }
    }

    /// Lenient parse used by the importer: unrecognized values resolve to
    /// the default category instead of failing the row.
    pub fn parse_lenient(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// Canonical code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FullPrice => "full-price",
            Self::Concession => "concession",
            Self::Senior => "senior",
            Self::Minor => "minor",
            Self::Complimentary => "complimentary",
        }
    }
}

// =============================================================================
// Ticket Sale
// =============================================================================

/// Individual ticket sale record. Belongs to exactly one performance and
/// is never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSale {
    pub id: Option<Uuid>,
    pub performance_id: Uuid,
    pub category: TicketCategory,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub purchaser_name: String,
    pub purchaser_email: String,
    pub purchased_at: DateTime<Utc>,
}

impl TicketSale {
    pub fn new(performance_id: Uuid, category: TicketCategory, unit_price: Decimal, quantity: i64) -> Self {
        Self {
            id: None,
            performance_id,
            category,
            unit_price,
            quantity,
            purchaser_name: String::new(),
            purchaser_email: String::new(),
            purchased_at: Utc::now(),
        }
    }

    /// Total price of this sale: unit price x quantity.
    pub fn total_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Audience Feedback
// =============================================================================

/// Audience survey response. Belongs to exactly one performance and is
/// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: Option<Uuid>,
    pub performance_id: Uuid,
    /// Star rating, 1 through 5 inclusive.
    pub rating: i64,
    pub comments: String,
    pub name: String,
    pub email: String,
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(performance_id: Uuid, rating: i64) -> Self {
        Self {
            id: None,
            performance_id,
            rating,
            comments: String::new(),
            name: String::new(),
            email: String::new(),
            submitted_at: Utc::now(),
        }
    }
}

// =============================================================================
// Cast & Crew
// =============================================================================

/// Cast member of a production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: Option<Uuid>,
    pub production_id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    /// Sort position in the cast list.
    pub order: i64,
}

/// Crew/staff member of a production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: Option<Uuid>,
    pub production_id: Uuid,
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub order: i64,
}

// =============================================================================
// Import Audit Trail
// =============================================================================

/// The five bulk-loadable record categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Events,
    Cast,
    Crew,
    Tickets,
    Feedback,
}

impl ImportKind {
    /// All kinds, in selector order.
    pub const ALL: [ImportKind; 5] = [
        Self::Events,
        Self::Cast,
        Self::Crew,
        Self::Tickets,
        Self::Feedback,
    ];

    /// Parse one of the five fixed selector tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "events" => Some(Self::Events),
            "cast" => Some(Self::Cast),
            "crew" => Some(Self::Crew),
            "tickets" => Some(Self::Tickets),
            "feedback" => Some(Self::Feedback),
            _ => None,
        }
    }

    /// Selector token.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Cast => "cast",
            Self::Crew => "crew",
            Self::Tickets => "tickets",
            Self::Feedback => "feedback",
        }
    }

    /// Human-readable label for messages and audit display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Events => "Events",
            Self::Cast => "Cast Members",
            Self::Crew => "Crew Members",
            Self::Tickets => "Ticket Sales",
            Self::Feedback => "Audience Feedback",
        }
    }
}

/// Where an import came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    /// Delimited-file (CSV) upload.
    #[default]
    Csv,
    /// Spreadsheet upload.
    Excel,
    /// Manual entry.
    Manual,
}

impl ImportSource {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Manual => "manual",
        }
    }
}

/// Provenance record for one import invocation. Append-only: created
/// exactly once per invocation, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: Option<Uuid>,
    pub organization_id: Uuid,
    pub production_id: Option<Uuid>,
    pub source: ImportSource,
    pub kind: ImportKind,
    pub imported_at: DateTime<Utc>,
    pub imported_by: String,
    pub records_imported: i64,
    /// Newline-joined error log; empty when the import was clean.
    pub errors: String,
    /// Name of the stored upload, when the file copy was retained.
    pub stored_file: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_category_from_code() {
        assert_eq!(TicketCategory::from_code("full-price"), Some(TicketCategory::FullPrice));
        assert_eq!(TicketCategory::from_code("ADULT"), Some(TicketCategory::FullPrice));
        assert_eq!(TicketCategory::from_code("student"), Some(TicketCategory::Concession));
        assert_eq!(TicketCategory::from_code("child"), Some(TicketCategory::Minor));
        assert_eq!(TicketCategory::from_code("comp"), Some(TicketCategory::Complimentary));
        assert_eq!(TicketCategory::from_code("backstage-pass"), None);
    }

    #[test]
    fn test_ticket_category_lenient_default() {
        assert_eq!(TicketCategory::parse_lenient("backstage-pass"), TicketCategory::FullPrice);
        assert_eq!(TicketCategory::parse_lenient("senior"), TicketCategory::Senior);
    }

    #[test]
    fn test_ticket_category_roundtrip() {
        for cat in [
            TicketCategory::FullPrice,
            TicketCategory::Concession,
            TicketCategory::Senior,
            TicketCategory::Minor,
            TicketCategory::Complimentary,
        ] {
            assert_eq!(TicketCategory::from_code(cat.code()), Some(cat));
        }
    }

    #[test]
    fn test_import_kind_tokens() {
        for kind in ImportKind::ALL {
            assert_eq!(ImportKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(ImportKind::from_token("reports"), None);
    }

    #[test]
    fn test_total_price() {
        let sale = TicketSale::new(
            Uuid::new_v4(),
            TicketCategory::FullPrice,
            Decimal::new(1550, 2),
            3,
        );
        assert_eq!(sale.total_price(), Decimal::new(4650, 2));
    }

    #[test]
    fn test_performance_defaults_and_derived() {
        let mut perf = Performance::new(
            Uuid::new_v4(),
            NaiveDateTime::parse_from_str("2024-01-10 19:00", "%Y-%m-%d %H:%M").unwrap(),
        );
        assert_eq!(perf.capacity, 0);
        assert_eq!(perf.tickets_sold, 0);
        assert_eq!(perf.revenue, Decimal::ZERO);
        assert_eq!(perf.attendance_percentage(), 0.0);

        perf.capacity = 100;
        perf.tickets_sold = 40;
        assert_eq!(perf.attendance_percentage(), 40.0);
        assert_eq!(perf.tickets_remaining(), 60);

        // over-sell is recorded, remaining floors at zero
        perf.tickets_sold = 120;
        assert_eq!(perf.tickets_remaining(), 0);
    }
}
