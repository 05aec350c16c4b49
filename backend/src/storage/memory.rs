//! In-memory storage implementation for tests and the demo server.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Storage;
use crate::error::{StorageError, StorageResult};
use crate::models::{
    CastMember, CrewMember, FeedbackEntry, ImportRecord, Performance, Production, TicketSale,
};

/// `Mutex<HashMap>`-backed [`Storage`]. Counter increments hold the
/// performance map lock for the whole read-modify-write.
#[derive(Default)]
pub struct MemoryStorage {
    productions: Mutex<HashMap<Uuid, Production>>,
    performances: Mutex<HashMap<Uuid, Performance>>,
    ticket_sales: Mutex<HashMap<Uuid, TicketSale>>,
    feedback: Mutex<HashMap<Uuid, FeedbackEntry>>,
    cast: Mutex<HashMap<Uuid, CastMember>>,
    crew: Mutex<HashMap<Uuid, CrewMember>>,
    imports: Mutex<HashMap<Uuid, ImportRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audit entries, newest first. Not part of the [`Storage`] trait:
    /// the pipeline only appends; reading the trail is a display concern.
    pub fn import_records(&self) -> Vec<ImportRecord> {
        let mut records: Vec<ImportRecord> =
            self.imports.lock().unwrap().values().cloned().collect();
        records.sort_by(|a, b| b.imported_at.cmp(&a.imported_at));
        records
    }

    /// Sales attached to one performance.
    pub fn ticket_sales_for(&self, performance_id: Uuid) -> Vec<TicketSale> {
        self.ticket_sales
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.performance_id == performance_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_production(&self, production: &mut Production) -> StorageResult<()> {
        let id = Uuid::new_v4();
        production.id = Some(id);
        self.productions.lock().unwrap().insert(id, production.clone());
        Ok(())
    }

    async fn get_production(&self, id: Uuid) -> StorageResult<Option<Production>> {
        Ok(self.productions.lock().unwrap().get(&id).cloned())
    }

    async fn create_performance(&self, performance: &mut Performance) -> StorageResult<()> {
        let id = Uuid::new_v4();
        performance.id = Some(id);
        self.performances.lock().unwrap().insert(id, performance.clone());
        Ok(())
    }

    async fn find_performance(
        &self,
        production_id: Uuid,
        starts_at: NaiveDateTime,
    ) -> StorageResult<Option<Performance>> {
        let performances = self.performances.lock().unwrap();
        let performance = performances
            .values()
            .find(|p| p.production_id == production_id && p.starts_at == starts_at)
            .cloned();
        Ok(performance)
    }

    async fn get_performances(&self, production_id: Uuid) -> StorageResult<Vec<Performance>> {
        let performances = self.performances.lock().unwrap();
        let mut matched: Vec<Performance> = performances
            .values()
            .filter(|p| p.production_id == production_id)
            .cloned()
            .collect();
        matched.sort_by_key(|p| p.starts_at);
        Ok(matched)
    }

    async fn add_ticket_totals(
        &self,
        performance_id: Uuid,
        quantity: i64,
        amount: Decimal,
    ) -> StorageResult<()> {
        let mut performances = self.performances.lock().unwrap();
        let performance = performances
            .get_mut(&performance_id)
            .ok_or_else(|| StorageError::NotFound(format!("performance {}", performance_id)))?;

        performance.tickets_sold += quantity;
        performance.revenue += amount;
        Ok(())
    }

    async fn create_ticket_sale(&self, sale: &mut TicketSale) -> StorageResult<()> {
        let id = Uuid::new_v4();
        sale.id = Some(id);
        self.ticket_sales.lock().unwrap().insert(id, sale.clone());
        Ok(())
    }

    async fn create_feedback(&self, entry: &mut FeedbackEntry) -> StorageResult<()> {
        let id = Uuid::new_v4();
        entry.id = Some(id);
        self.feedback.lock().unwrap().insert(id, entry.clone());
        Ok(())
    }

    async fn create_cast_member(&self, member: &mut CastMember) -> StorageResult<()> {
        let id = Uuid::new_v4();
        member.id = Some(id);
        self.cast.lock().unwrap().insert(id, member.clone());
        Ok(())
    }

    async fn create_crew_member(&self, member: &mut CrewMember) -> StorageResult<()> {
        let id = Uuid::new_v4();
        member.id = Some(id);
        self.crew.lock().unwrap().insert(id, member.clone());
        Ok(())
    }

    async fn get_feedback_for_production(
        &self,
        production_id: Uuid,
    ) -> StorageResult<Vec<FeedbackEntry>> {
        let performance_ids: Vec<Uuid> = {
            let performances = self.performances.lock().unwrap();
            performances
                .values()
                .filter(|p| p.production_id == production_id)
                .filter_map(|p| p.id)
                .collect()
        };

        let feedback = self.feedback.lock().unwrap();
        Ok(feedback
            .values()
            .filter(|f| performance_ids.contains(&f.performance_id))
            .cloned()
            .collect())
    }

    async fn create_import_record(&self, record: &mut ImportRecord) -> StorageResult<()> {
        let id = Uuid::new_v4();
        record.id = Some(id);
        self.imports.lock().unwrap().insert(id, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TIMESTAMP_FORMAT;

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let storage = MemoryStorage::new();
        let mut production = Production::new(Uuid::new_v4(), "Macbeth");
        assert!(production.id.is_none());

        storage.create_production(&mut production).await.unwrap();
        let id = production.id.unwrap();

        let loaded = storage.get_production(id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Macbeth");
    }

    #[tokio::test]
    async fn test_find_performance_exact_key() {
        let storage = MemoryStorage::new();
        let production_id = Uuid::new_v4();

        let mut performance = Performance::new(production_id, ts("2024-01-10 19:00"));
        storage.create_performance(&mut performance).await.unwrap();

        let found = storage
            .find_performance(production_id, ts("2024-01-10 19:00"))
            .await
            .unwrap();
        assert!(found.is_some());

        // same production, different minute: no match
        let missed = storage
            .find_performance(production_id, ts("2024-01-10 19:01"))
            .await
            .unwrap();
        assert!(missed.is_none());

        // same timestamp, different production: no match
        let missed = storage
            .find_performance(Uuid::new_v4(), ts("2024-01-10 19:00"))
            .await
            .unwrap();
        assert!(missed.is_none());
    }

    #[tokio::test]
    async fn test_add_ticket_totals_accumulates() {
        let storage = MemoryStorage::new();
        let production_id = Uuid::new_v4();

        let mut performance = Performance::new(production_id, ts("2024-01-10 19:00"));
        performance.tickets_sold = 40;
        performance.revenue = Decimal::new(60000, 2);
        storage.create_performance(&mut performance).await.unwrap();
        let id = performance.id.unwrap();

        storage
            .add_ticket_totals(id, 2, Decimal::new(3000, 2))
            .await
            .unwrap();
        storage
            .add_ticket_totals(id, 1, Decimal::new(1500, 2))
            .await
            .unwrap();

        let updated = storage
            .find_performance(production_id, ts("2024-01-10 19:00"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.tickets_sold, 43);
        assert_eq!(updated.revenue, Decimal::new(64500, 2));
    }

    #[tokio::test]
    async fn test_add_ticket_totals_unknown_performance() {
        let storage = MemoryStorage::new();
        let result = storage
            .add_ticket_totals(Uuid::new_v4(), 1, Decimal::ONE)
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_performances_sorted_by_start() {
        let storage = MemoryStorage::new();
        let production_id = Uuid::new_v4();

        for raw in ["2024-01-12 19:00", "2024-01-10 19:00", "2024-01-11 14:00"] {
            let mut performance = Performance::new(production_id, ts(raw));
            storage.create_performance(&mut performance).await.unwrap();
        }

        let performances = storage.get_performances(production_id).await.unwrap();
        assert_eq!(performances.len(), 3);
        assert!(performances.windows(2).all(|w| w[0].starts_at <= w[1].starts_at));
    }

    #[tokio::test]
    async fn test_feedback_scoped_to_production() {
        let storage = MemoryStorage::new();
        let production_id = Uuid::new_v4();
        let other_production = Uuid::new_v4();

        let mut performance = Performance::new(production_id, ts("2024-01-10 19:00"));
        storage.create_performance(&mut performance).await.unwrap();
        let mut other = Performance::new(other_production, ts("2024-01-10 19:00"));
        storage.create_performance(&mut other).await.unwrap();

        let mut entry = FeedbackEntry::new(performance.id.unwrap(), 4);
        storage.create_feedback(&mut entry).await.unwrap();
        let mut foreign = FeedbackEntry::new(other.id.unwrap(), 2);
        storage.create_feedback(&mut foreign).await.unwrap();

        let scoped = storage
            .get_feedback_for_production(production_id)
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].rating, 4);
    }
}
