//! Process-local property cache
//!
//! Holds the full property collection, refreshed on mount and after every
//! successful mutation. Derived views (favorites, search) are pure functions
//! over the cached collection; no separate favorites entity exists.

use std::sync::RwLock;
use uuid::Uuid;

use super::Outcome;
use super::transport::PropertyTransport;
use crate::model::property::{NewProperty, Property, PropertyPatch, PropertyQuery, PropertyStatus};
use crate::upload::ImageFile;

/// Client-side cache and coordinator for the property collection
pub struct PropertyContext<T: PropertyTransport> {
    transport: T,
    cache: RwLock<Vec<Property>>,
}

impl<T: PropertyTransport> PropertyContext<T> {
    /// Create the context and load the collection from the API
    ///
    /// A failed initial load leaves an empty cache; the outcome reports the
    /// failure so the UI can surface it.
    pub async fn mount(transport: T) -> (Self, Outcome<usize>) {
        let context = Self {
            transport,
            cache: RwLock::new(Vec::new()),
        };
        let outcome = context.refresh().await;
        (context, outcome)
    }

    /// Reload the collection from the API, replacing the cache
    pub async fn refresh(&self) -> Outcome<usize> {
        match self.transport.fetch_all().await {
            Ok(properties) => {
                let count = properties.len();
                *self.cache.write().unwrap_or_else(|e| e.into_inner()) = properties;
                Outcome::Success(count)
            }
            Err(e) => Outcome::Failure(e),
        }
    }

    /// Snapshot of the cached collection
    pub fn properties(&self) -> Vec<Property> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Create a property with its images
    ///
    /// On success the returned record is merged into the cache and a refresh
    /// follows; on failure the cache is untouched and the error class is
    /// reported for the UI to present.
    pub async fn add_property(
        &self,
        new: NewProperty,
        images: Vec<ImageFile>,
    ) -> Outcome<Property> {
        match self.transport.create(&new, images).await {
            Ok(property) => {
                self.merge(property.clone());
                self.refresh_after_mutation().await;
                Outcome::Success(property)
            }
            Err(e) => Outcome::Failure(e),
        }
    }

    /// Merge a partial update into an existing property
    pub async fn update_property(&self, id: &Uuid, patch: PropertyPatch) -> Outcome<Property> {
        match self.transport.update(id, &patch).await {
            Ok(property) => {
                self.merge(property.clone());
                self.refresh_after_mutation().await;
                Outcome::Success(property)
            }
            Err(e) => Outcome::Failure(e),
        }
    }

    /// Delete a property
    pub async fn remove_property(&self, id: &Uuid) -> Outcome<()> {
        match self.transport.delete(id).await {
            Ok(()) => {
                self.cache
                    .write()
                    .unwrap_or_else(|e| e.into_inner())
                    .retain(|p| &p.id != id);
                self.refresh_after_mutation().await;
                Outcome::Success(())
            }
            Err(e) => Outcome::Failure(e),
        }
    }

    /// Favorites view: featured properties that are still available
    pub fn favorites(&self) -> Vec<Property> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|p| p.featured && p.status == PropertyStatus::Available)
            .cloned()
            .collect()
    }

    /// Filter the cached collection with a search query
    pub fn search(&self, query: &PropertyQuery) -> Vec<Property> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect()
    }

    /// Insert or replace one record in the cache
    fn merge(&self, property: Property) {
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        match cache.iter_mut().find(|p| p.id == property.id) {
            Some(slot) => *slot = property,
            None => cache.push(property),
        }
    }

    /// Best-effort reload after a successful mutation; the merged record
    /// already reflects the authoritative response, so a failed refresh is
    /// only logged
    async fn refresh_after_mutation(&self) {
        if let Outcome::Failure(e) = self.refresh().await {
            tracing::warn!("cache refresh after mutation failed: {}", e);
        }
    }
}
