//! In-memory store implementations for development and testing
//!
//! Backed by `Arc<RwLock<IndexMap>>`: thread-safe, and insertion order is
//! preserved so `list()` returns records in creation order.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::{PropertyStore, ScheduleStore};
use crate::core::error::{EstateResult, PropertyError, ScheduleError};
use crate::model::property::{ImageRef, NewProperty, Property, PropertyPatch};
use crate::model::schedule::{NewSchedule, Schedule, ScheduleStatus};

/// In-memory property store
#[derive(Clone, Default)]
pub struct InMemoryPropertyStore {
    properties: Arc<RwLock<IndexMap<Uuid, Property>>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn list(&self) -> EstateResult<Vec<Property>> {
        let properties = self.properties.read().unwrap_or_else(|e| e.into_inner());
        Ok(properties.values().cloned().collect())
    }

    async fn get(&self, id: &Uuid) -> EstateResult<Property> {
        let properties = self.properties.read().unwrap_or_else(|e| e.into_inner());
        properties
            .get(id)
            .cloned()
            .ok_or_else(|| PropertyError::NotFound { id: *id }.into())
    }

    async fn create(&self, new: NewProperty, images: Vec<ImageRef>) -> EstateResult<Property> {
        new.validate()?;

        let property = Property::from_new(new, images);
        let mut properties = self.properties.write().unwrap_or_else(|e| e.into_inner());
        properties.insert(property.id, property.clone());

        Ok(property)
    }

    async fn update(&self, id: &Uuid, patch: PropertyPatch) -> EstateResult<Property> {
        patch.validate()?;

        let mut properties = self.properties.write().unwrap_or_else(|e| e.into_inner());
        let property = properties
            .get_mut(id)
            .ok_or(PropertyError::NotFound { id: *id })?;

        patch.apply(property);
        Ok(property.clone())
    }

    async fn delete(&self, id: &Uuid) -> EstateResult<()> {
        let mut properties = self.properties.write().unwrap_or_else(|e| e.into_inner());
        // shift_remove keeps insertion order for the survivors
        properties
            .shift_remove(id)
            .ok_or(PropertyError::NotFound { id: *id })?;
        Ok(())
    }
}

/// In-memory schedule store
#[derive(Clone, Default)]
pub struct InMemoryScheduleStore {
    schedules: Arc<RwLock<IndexMap<Uuid, Schedule>>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn list(&self) -> EstateResult<Vec<Schedule>> {
        let schedules = self.schedules.read().unwrap_or_else(|e| e.into_inner());
        Ok(schedules.values().cloned().collect())
    }

    async fn get(&self, id: &Uuid) -> EstateResult<Schedule> {
        let schedules = self.schedules.read().unwrap_or_else(|e| e.into_inner());
        schedules
            .get(id)
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound { id: *id }.into())
    }

    async fn create(&self, new: NewSchedule) -> EstateResult<Schedule> {
        let schedule = Schedule::from_new(new);
        let mut schedules = self.schedules.write().unwrap_or_else(|e| e.into_inner());
        schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn set_status(&self, id: &Uuid, status: ScheduleStatus) -> EstateResult<Schedule> {
        let mut schedules = self.schedules.write().unwrap_or_else(|e| e.into_inner());
        let schedule = schedules
            .get_mut(id)
            .ok_or(ScheduleError::NotFound { id: *id })?;

        schedule.transition(status)?;
        Ok(schedule.clone())
    }

    async fn delete(&self, id: &Uuid) -> EstateResult<()> {
        let mut schedules = self.schedules.write().unwrap_or_else(|e| e.into_inner());
        schedules
            .shift_remove(id)
            .ok_or(ScheduleError::NotFound { id: *id })?;
        Ok(())
    }
}
