//! Per-import-type column rules and field coercion.
//!
//! Each import type has a fixed, ordered table of [`ColumnRule`]s:
//! (column name, required?, semantic type, default-if-absent). The
//! coercion engine walks the table for a parsed row and produces typed
//! [`FieldValue`]s, so the five import types stay uniform and a new
//! column is one table entry, not a new code branch.
//!
//! Defaults are expressed as raw strings and fed through the same
//! conversion as real input.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::{RowError, RowResult};
use crate::models::{ImportKind, TicketCategory};
use crate::parser::Row;

/// Literal timestamp pattern used by every date/time column (24-hour).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// =============================================================================
// Column Rules
// =============================================================================

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Timestamp,
    Currency,
    Integer,
    Text,
    Category,
}

/// One entry of an import type's column table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Raw default coerced in place of an absent or blank optional column.
    pub default: &'static str,
    /// Inclusive bounds for integer columns.
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl ColumnRule {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: "",
            min: None,
            max: None,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default,
            min: None,
            max: None,
        }
    }

    const fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    const fn at_least(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }
}

const EVENT_COLUMNS: &[ColumnRule] = &[
    ColumnRule::required("date", FieldKind::Timestamp),
    ColumnRule::optional("venue", FieldKind::Text, ""),
    ColumnRule::optional("capacity", FieldKind::Integer, "0").at_least(0),
    ColumnRule::optional("tickets_sold", FieldKind::Integer, "0").at_least(0),
    ColumnRule::optional("revenue", FieldKind::Currency, "0.00"),
    ColumnRule::optional("notes", FieldKind::Text, ""),
];

const CAST_COLUMNS: &[ColumnRule] = &[
    ColumnRule::required("name", FieldKind::Text),
    ColumnRule::optional("role", FieldKind::Text, ""),
    ColumnRule::optional("email", FieldKind::Text, ""),
    ColumnRule::optional("phone", FieldKind::Text, ""),
    ColumnRule::optional("order", FieldKind::Integer, "0"),
];

const CREW_COLUMNS: &[ColumnRule] = &[
    ColumnRule::required("name", FieldKind::Text),
    ColumnRule::optional("position", FieldKind::Text, ""),
    ColumnRule::optional("email", FieldKind::Text, ""),
    ColumnRule::optional("phone", FieldKind::Text, ""),
    ColumnRule::optional("order", FieldKind::Integer, "0"),
];

const TICKET_COLUMNS: &[ColumnRule] = &[
    ColumnRule::required("event_date", FieldKind::Timestamp),
    ColumnRule::optional("ticket_type", FieldKind::Category, ""),
    ColumnRule::optional("price", FieldKind::Currency, "0.00"),
    // quantity defaults to 1, not 0
    ColumnRule::optional("quantity", FieldKind::Integer, "1").at_least(1),
    ColumnRule::optional("purchaser_name", FieldKind::Text, ""),
    ColumnRule::optional("purchaser_email", FieldKind::Text, ""),
];

const FEEDBACK_COLUMNS: &[ColumnRule] = &[
    ColumnRule::required("event_date", FieldKind::Timestamp),
    ColumnRule::optional("rating", FieldKind::Integer, "5").range(1, 5),
    ColumnRule::optional("comments", FieldKind::Text, ""),
    ColumnRule::optional("name", FieldKind::Text, ""),
    ColumnRule::optional("email", FieldKind::Text, ""),
];

/// Column table for an import type.
pub fn columns(kind: ImportKind) -> &'static [ColumnRule] {
    match kind {
        ImportKind::Events => EVENT_COLUMNS,
        ImportKind::Cast => CAST_COLUMNS,
        ImportKind::Crew => CREW_COLUMNS,
        ImportKind::Tickets => TICKET_COLUMNS,
        ImportKind::Feedback => FEEDBACK_COLUMNS,
    }
}

// =============================================================================
// Field Values
// =============================================================================

/// A coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Timestamp(NaiveDateTime),
    Currency(Decimal),
    Integer(i64),
    Text(String),
    Category(TicketCategory),
}

/// A fully coerced row: every column of the kind's table carries a typed
/// value (required ones validated, optional ones defaulted).
#[derive(Debug, Clone)]
pub struct CoercedRow {
    values: HashMap<&'static str, FieldValue>,
}

impl CoercedRow {
    /// Start timestamp of a timestamp column. Timestamp columns are
    /// required in every table that carries them, so `None` only occurs
    /// for a column outside the kind's table.
    pub fn timestamp(&self, column: &str) -> Option<NaiveDateTime> {
        match self.values.get(column) {
            Some(FieldValue::Timestamp(ts)) => Some(*ts),
            _ => None,
        }
    }

    /// Columns outside the kind's table resolve to zero.
    pub fn currency(&self, column: &str) -> Decimal {
        match self.values.get(column) {
            Some(FieldValue::Currency(amount)) => *amount,
            _ => Decimal::ZERO,
        }
    }

    /// Columns outside the kind's table resolve to zero.
    pub fn integer(&self, column: &str) -> i64 {
        match self.values.get(column) {
            Some(FieldValue::Integer(n)) => *n,
            _ => 0,
        }
    }

    /// Columns outside the kind's table resolve to the empty string.
    pub fn text(&self, column: &str) -> &str {
        match self.values.get(column) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    /// Columns outside the kind's table resolve to the default category.
    pub fn category(&self, column: &str) -> TicketCategory {
        match self.values.get(column) {
            Some(FieldValue::Category(cat)) => *cat,
            _ => TicketCategory::default(),
        }
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Coerce one parsed row against an import type's column table.
///
/// A required column absent from the header or blank in the row yields
/// [`RowError::MissingField`]; a value that does not convert yields
/// [`RowError::FieldFormat`]. Both are per-row failures.
pub fn coerce_row(kind: ImportKind, row: &Row) -> RowResult<CoercedRow> {
    let mut values = HashMap::new();

    for rule in columns(kind) {
        let raw = row.get(rule.name).map(str::trim).unwrap_or("");

        let raw = if raw.is_empty() {
            if rule.required {
                return Err(RowError::missing(rule.name));
            }
            rule.default
        } else {
            raw
        };

        values.insert(rule.name, convert(rule, raw)?);
    }

    Ok(CoercedRow { values })
}

fn convert(rule: &ColumnRule, raw: &str) -> RowResult<FieldValue> {
    match rule.kind {
        FieldKind::Timestamp => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map(FieldValue::Timestamp)
            .map_err(|_| {
                RowError::format(rule.name, raw, "expected timestamp in YYYY-MM-DD HH:MM format")
            }),

        FieldKind::Currency => {
            let amount = Decimal::from_str(raw)
                .map_err(|_| RowError::format(rule.name, raw, "expected a decimal amount"))?;
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(RowError::format(rule.name, raw, "amount must not be negative"));
            }
            Ok(FieldValue::Currency(amount))
        }

        FieldKind::Integer => {
            let n: i64 = raw
                .parse()
                .map_err(|_| RowError::format(rule.name, raw, "expected an integer"))?;
            match (rule.min, rule.max) {
                (Some(min), Some(max)) if n < min || n > max => Err(RowError::format(
                    rule.name,
                    raw,
                    format!("must be between {} and {}", min, max),
                )),
                (Some(min), None) if n < min => {
                    Err(RowError::format(rule.name, raw, format!("must be at least {}", min)))
                }
                _ => Ok(FieldValue::Integer(n)),
            }
        }

        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),

        // Lenient: unrecognized category codes resolve to the default
        // category, they never fail the row.
        FieldKind::Category => Ok(FieldValue::Category(TicketCategory::parse_lenient(raw))),
    }
}
