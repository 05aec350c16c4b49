//! Audit recorder: one provenance entry per import invocation.
//!
//! The audit trail is part of an import's definition of success. The
//! recorder is a pure append; it runs exactly once per invocation,
//! whether the row loop finished cleanly or was aborted, and its own
//! persistence failure is the terminal failure of the whole operation.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ImportError, ImportResult};
use crate::models::{ImportKind, ImportRecord, ImportSource};
use crate::storage::Storage;

/// Persist the audit entry for one import invocation.
#[allow(clippy::too_many_arguments)]
pub async fn record_import(
    storage: &dyn Storage,
    organization_id: Uuid,
    production_id: Option<Uuid>,
    source: ImportSource,
    kind: ImportKind,
    imported_by: &str,
    created: usize,
    errors: &[String],
    stored_file: Option<String>,
) -> ImportResult<ImportRecord> {
    let mut record = ImportRecord {
        id: None,
        organization_id,
        production_id,
        source,
        kind,
        imported_at: Utc::now(),
        imported_by: imported_by.to_string(),
        records_imported: created as i64,
        errors: errors.join("\n"),
        stored_file,
    };

    storage
        .create_import_record(&mut record)
        .await
        .map_err(ImportError::Audit)?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_records_one_entry() {
        let storage = MemoryStorage::new();
        let organization_id = Uuid::new_v4();
        let production_id = Uuid::new_v4();

        let record = record_import(
            &storage,
            organization_id,
            Some(production_id),
            ImportSource::Csv,
            ImportKind::Tickets,
            "box-office@venue",
            12,
            &["line 4: missing required column 'event_date'".to_string()],
            Some("sales-january.csv".to_string()),
        )
        .await
        .unwrap();

        assert!(record.id.is_some());
        assert_eq!(record.records_imported, 12);
        assert_eq!(record.imported_by, "box-office@venue");
        assert_eq!(storage.import_records().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_newline_joined() {
        let storage = MemoryStorage::new();

        let record = record_import(
            &storage,
            Uuid::new_v4(),
            None,
            ImportSource::Csv,
            ImportKind::Events,
            "admin",
            0,
            &["line 2: bad".to_string(), "line 3: worse".to_string()],
            None,
        )
        .await
        .unwrap();

        assert_eq!(record.errors, "line 2: bad\nline 3: worse");
    }

    #[tokio::test]
    async fn test_clean_import_has_empty_error_log() {
        let storage = MemoryStorage::new();

        let record = record_import(
            &storage,
            Uuid::new_v4(),
            None,
            ImportSource::Csv,
            ImportKind::Cast,
            "admin",
            3,
            &[],
            None,
        )
        .await
        .unwrap();

        assert!(record.errors.is_empty());
    }
}
