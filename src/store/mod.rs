//! Persistence contracts for properties and schedules
//!
//! The platform is agnostic to the underlying storage mechanism: handlers
//! talk to these traits, and backends implement them. The in-memory backend
//! in [`memory`] is the reference implementation.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::EstateResult;
use crate::model::property::{ImageRef, NewProperty, Property, PropertyPatch};
use crate::model::schedule::{NewSchedule, Schedule, ScheduleStatus};

pub use memory::{InMemoryPropertyStore, InMemoryScheduleStore};

/// Store for property records
///
/// Single-document, id-keyed operations; no cross-record transactions.
/// Concurrent updates of the same id are last-write-wins.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// List all properties in insertion order, no filtering applied
    async fn list(&self) -> EstateResult<Vec<Property>>;

    /// Get one property, failing with NotFound if absent
    async fn get(&self, id: &Uuid) -> EstateResult<Property>;

    /// Validate the payload, assign an id, and persist the record with its
    /// image references attached
    async fn create(&self, new: NewProperty, images: Vec<ImageRef>) -> EstateResult<Property>;

    /// Merge the provided fields into an existing record
    ///
    /// Fails with NotFound if the id is absent and with ValidationError if a
    /// provided field is malformed; the stored record is untouched on failure.
    async fn update(&self, id: &Uuid, patch: PropertyPatch) -> EstateResult<Property>;

    /// Remove a property; a second delete of the same id surfaces NotFound
    async fn delete(&self, id: &Uuid) -> EstateResult<()>;
}

/// Store for viewing schedules
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list(&self) -> EstateResult<Vec<Schedule>>;

    async fn get(&self, id: &Uuid) -> EstateResult<Schedule>;

    async fn create(&self, new: NewSchedule) -> EstateResult<Schedule>;

    /// Change status, enforcing the permitted transitions
    async fn set_status(&self, id: &Uuid, status: ScheduleStatus) -> EstateResult<Schedule>;

    async fn delete(&self, id: &Uuid) -> EstateResult<()>;
}
