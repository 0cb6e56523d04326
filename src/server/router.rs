//! Router wiring for the property and schedule resources
//!
//! - GET    /properties             — public list (query filters)
//! - GET    /properties/{id}        — public read
//! - POST   /properties             — admin/agent, multipart + ≤10 images
//! - PUT    /properties/{id}        — admin/agent, partial update
//! - DELETE /properties/{id}        — admin/agent
//! - GET    /schedules              — admin
//! - POST   /schedules              — authenticated
//! - PUT    /schedules/{id}/status  — admin
//! - DELETE /schedules/{id}         — admin

use axum::{
    Router,
    routing::{delete, get, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers::{
    create_property, create_schedule, delete_property, delete_schedule, get_property,
    list_properties, list_schedules, set_schedule_status, update_property,
};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/{id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/{id}/status", put(set_schedule_status))
        .route("/schedules/{id}", delete(delete_schedule))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
