//! Performance resolution for attached import types (tickets, feedback).
//!
//! Sale and survey rows carry the performance's start timestamp rather
//! than a record id, so rows are matched to the unique performance with
//! exactly that (production, start-timestamp) key. Exact match only: no
//! fuzzy or nearest-timestamp resolution.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::{RowError, RowFailure};
use crate::models::Performance;
use crate::schema::TIMESTAMP_FORMAT;
use crate::storage::Storage;

/// Resolve a raw performance-timestamp string to an existing performance
/// of `production_id`.
///
/// The raw value is parsed with the shared timestamp rule; a value that
/// does not parse is a per-row validation failure. A missing performance
/// is NOT an error: the caller receives `Ok(None)` and skips the row.
pub async fn resolve_performance(
    storage: &dyn Storage,
    production_id: Uuid,
    column: &str,
    raw: &str,
) -> Result<Option<Performance>, RowFailure> {
    let starts_at = NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        RowError::format(column, raw, "expected timestamp in YYYY-MM-DD HH:MM format")
    })?;

    let performance = storage.find_performance(production_id, starts_at).await?;
    Ok(performance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
    }

    #[tokio::test]
    async fn test_resolves_exact_match() {
        let storage = MemoryStorage::new();
        let production_id = Uuid::new_v4();

        let mut performance = Performance::new(production_id, ts("2024-01-10 19:00"));
        storage.create_performance(&mut performance).await.unwrap();

        let resolved = resolve_performance(&storage, production_id, "event_date", "2024-01-10 19:00")
            .await
            .unwrap();
        assert_eq!(resolved.unwrap().id, performance.id);
    }

    #[tokio::test]
    async fn test_no_match_is_none_not_error() {
        let storage = MemoryStorage::new();

        let resolved = resolve_performance(
            &storage,
            Uuid::new_v4(),
            "event_date",
            "2099-01-01 00:00",
        )
        .await
        .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_is_validation_failure() {
        let storage = MemoryStorage::new();

        let result =
            resolve_performance(&storage, Uuid::new_v4(), "event_date", "next friday").await;
        match result {
            Err(RowFailure::Validation(err)) => {
                assert!(err.to_string().contains("'event_date'"));
                assert!(err.to_string().contains("next friday"));
            }
            other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
        }
    }
}
