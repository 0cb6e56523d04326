//! # estately
//!
//! Core of a real-estate listing platform:
//!
//! - **Property store**: id-keyed CRUD over listed properties, insertion
//!   order preserved, last-write-wins on concurrent updates
//! - **Access guard**: bearer-credential authentication plus role allow-list
//!   authorization ahead of every mutating route
//! - **Upload handling**: up to 10 image files per creation request,
//!   all-or-nothing acceptance, compensating delete on late failure
//! - **REST surface**: axum routes for properties and viewing schedules
//! - **Client context**: process-local cache of the collection with derived
//!   views (favorites, search) and result-descriptor mutation reporting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use estately::prelude::*;
//! use std::sync::Arc;
//!
//! let auth = Arc::new(TokenRegistry::new());
//! let state = AppState {
//!     properties: Arc::new(InMemoryPropertyStore::new()),
//!     schedules: Arc::new(InMemoryScheduleStore::new()),
//!     files: Arc::new(LocalFileStore::new("uploads")),
//!     auth,
//! };
//! let app = build_router(state);
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod model;
pub mod server;
pub mod store;
pub mod upload;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, Role, Subject, TokenRegistry, guard},
        error::{EstateError, EstateResult, FieldViolation},
        menu::{MenuItem, menu_for},
    };

    // === Models ===
    pub use crate::model::{
        ImageRef, Location, MAX_IMAGES, NewProperty, NewSchedule, Property, PropertyPatch,
        PropertyQuery, PropertyStatus, PropertyType, Schedule, ScheduleStatus,
    };

    // === Stores ===
    pub use crate::store::{
        InMemoryPropertyStore, InMemoryScheduleStore, PropertyStore, ScheduleStore,
    };

    // === Upload ===
    pub use crate::upload::{FileStore, ImageFile, LocalFileStore};

    // === Server ===
    pub use crate::server::{AppState, build_router};

    // === Client ===
    pub use crate::client::{ErrorKind, HttpTransport, Outcome, PropertyContext, PropertyTransport};

    // === Config ===
    pub use crate::config::ServerConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
