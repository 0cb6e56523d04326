//! HTTP server: application state, route handlers, and the router
//!
//! Mutating property routes sit behind the access guard; reads are public.

pub mod handlers;
pub mod router;

use std::sync::Arc;

use crate::core::auth::AuthProvider;
use crate::store::{PropertyStore, ScheduleStore};
use crate::upload::FileStore;

pub use router::build_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub properties: Arc<dyn PropertyStore>,
    pub schedules: Arc<dyn ScheduleStore>,
    pub files: Arc<dyn FileStore>,
    pub auth: Arc<dyn AuthProvider>,
}
