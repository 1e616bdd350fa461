use std::sync::Arc;

use uuid::Uuid;

use super::cart::CartLine;
use super::errors::DomainError;
use super::export::{ExportEntity, ExportRecord};
use super::order::{OrderDraft, OrderView};

/// Persistence gateway for orders. `create` must write the order header
/// and every item as one atomic unit: a storage error leaves nothing
/// behind.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, draft: OrderDraft) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
}

/// Read-only gateway for the bulk export pipeline. `fetch_chunk`
/// returns already-flattened records for one bounded window, joining
/// whatever sub-relations the projection needs.
pub trait ExportSource: Send + Sync + 'static {
    fn count(&self, entity: ExportEntity) -> Result<i64, DomainError>;
    fn fetch_chunk(
        &self,
        entity: ExportEntity,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ExportRecord>, DomainError>;
}

/// Durable store for staged cart lines, keyed by customer.
pub trait CartStore: Send + Sync + 'static {
    fn load(&self, customer_id: Uuid) -> Result<Vec<CartLine>, DomainError>;
    fn save(&self, customer_id: Uuid, lines: &[CartLine]) -> Result<(), DomainError>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(&self, draft: OrderDraft) -> Result<OrderView, DomainError> {
        (**self).create(draft)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        (**self).find_by_id(id)
    }
}

impl<T: ExportSource + ?Sized> ExportSource for Arc<T> {
    fn count(&self, entity: ExportEntity) -> Result<i64, DomainError> {
        (**self).count(entity)
    }

    fn fetch_chunk(
        &self,
        entity: ExportEntity,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ExportRecord>, DomainError> {
        (**self).fetch_chunk(entity, offset, limit)
    }
}

impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    fn load(&self, customer_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        (**self).load(customer_id)
    }

    fn save(&self, customer_id: Uuid, lines: &[CartLine]) -> Result<(), DomainError> {
        (**self).save(customer_id, lines)
    }
}
