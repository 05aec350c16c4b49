//! Record-storage interface consumed by the import pipeline.
//!
//! Persistence is an external collaborator: the pipeline only needs
//! create/query operations plus one atomic counter increment, expressed
//! as the [`Storage`] trait. [`MemoryStorage`] is the bundled in-memory
//! implementation used by tests and the demo server.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::models::{
    CastMember, CrewMember, FeedbackEntry, ImportRecord, Performance, Production, TicketSale,
};

mod memory;

pub use memory::MemoryStorage;

/// Storage operations required by the import pipeline and the summary
/// queries. Implementations assign record ids on create.
#[async_trait]
pub trait Storage: Send + Sync {
    // Production operations
    async fn create_production(&self, production: &mut Production) -> StorageResult<()>;
    async fn get_production(&self, id: Uuid) -> StorageResult<Option<Production>>;

    // Performance operations
    async fn create_performance(&self, performance: &mut Performance) -> StorageResult<()>;
    async fn find_performance(
        &self,
        production_id: Uuid,
        starts_at: NaiveDateTime,
    ) -> StorageResult<Option<Performance>>;
    async fn get_performances(&self, production_id: Uuid) -> StorageResult<Vec<Performance>>;

    /// Atomically add an applied sale to a performance's cumulative
    /// counters: `quantity` onto tickets-sold and `amount` onto revenue.
    ///
    /// This is the pipeline's only read-modify-write; keeping it a single
    /// storage operation lets implementations guarantee isolation with an
    /// atomic update or row lock.
    async fn add_ticket_totals(
        &self,
        performance_id: Uuid,
        quantity: i64,
        amount: Decimal,
    ) -> StorageResult<()>;

    // Child record operations
    async fn create_ticket_sale(&self, sale: &mut TicketSale) -> StorageResult<()>;
    async fn create_feedback(&self, entry: &mut FeedbackEntry) -> StorageResult<()>;
    async fn create_cast_member(&self, member: &mut CastMember) -> StorageResult<()>;
    async fn create_crew_member(&self, member: &mut CrewMember) -> StorageResult<()>;

    /// All feedback entries attached to a production's performances.
    async fn get_feedback_for_production(
        &self,
        production_id: Uuid,
    ) -> StorageResult<Vec<FeedbackEntry>>;

    // Audit trail (append-only)
    async fn create_import_record(&self, record: &mut ImportRecord) -> StorageResult<()>;
}
