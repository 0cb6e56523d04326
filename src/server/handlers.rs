//! Route handlers for properties and schedules

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::AppState;
use crate::core::auth::{self, AuthPolicy, PROPERTY_MUTATION, SCHEDULE_ADMIN};
use crate::core::error::EstateResult;
use crate::model::property::{NewProperty, Property, PropertyPatch, PropertyQuery};
use crate::model::schedule::{NewSchedule, Schedule, ScheduleStatus};
use crate::upload;

// =============================================================================
// Properties
// =============================================================================

/// GET /properties — public listing, optionally filtered by query params
pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> EstateResult<Json<Value>> {
    let properties: Vec<Property> = state
        .properties
        .list()
        .await?
        .into_iter()
        .filter(|p| query.matches(p))
        .collect();

    Ok(Json(json!({
        "properties": properties,
        "count": properties.len()
    })))
}

/// GET /properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> EstateResult<Json<Property>> {
    Ok(Json(state.properties.get(&id).await?))
}

/// POST /properties — admin/agent only; multipart fields plus ≤10 images
///
/// Files are persisted only after the payload has passed validation, and a
/// store failure after persistence triggers a compensating delete, so a
/// rejected creation leaves no trace.
pub async fn create_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> EstateResult<(StatusCode, Json<Property>)> {
    let subject = auth::guard(state.auth.as_ref(), &headers, &PROPERTY_MUTATION).await?;

    let form = upload::parse_listing_form(multipart).await?;
    let new = NewProperty::from_form(&form.fields)?;
    new.validate()?;

    let refs = upload::save_all(state.files.as_ref(), &form.images).await?;

    let property = match state.properties.create(new, refs.clone()).await {
        Ok(property) => property,
        Err(e) => {
            upload::remove_all(state.files.as_ref(), &refs).await;
            return Err(e);
        }
    };

    tracing::info!(
        property = %property.id,
        subject = %subject.id,
        images = property.images.len(),
        "property created"
    );
    Ok((StatusCode::CREATED, Json(property)))
}

/// PUT /properties/{id} — admin/agent only; partial-field merge
pub async fn update_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(patch): Json<PropertyPatch>,
) -> EstateResult<Json<Property>> {
    let subject = auth::guard(state.auth.as_ref(), &headers, &PROPERTY_MUTATION).await?;

    let property = state.properties.update(&id, patch).await?;
    tracing::info!(property = %id, subject = %subject.id, "property updated");
    Ok(Json(property))
}

/// DELETE /properties/{id} — admin/agent only
pub async fn delete_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> EstateResult<StatusCode> {
    let subject = auth::guard(state.auth.as_ref(), &headers, &PROPERTY_MUTATION).await?;

    state.properties.delete(&id).await?;
    tracing::info!(property = %id, subject = %subject.id, "property deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Schedules
// =============================================================================

/// GET /schedules — admin only
pub async fn list_schedules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> EstateResult<Json<Value>> {
    auth::guard(state.auth.as_ref(), &headers, &SCHEDULE_ADMIN).await?;

    let schedules = state.schedules.list().await?;
    Ok(Json(json!({
        "schedules": schedules,
        "count": schedules.len()
    })))
}

/// POST /schedules — any authenticated subject books a viewing
pub async fn create_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewSchedule>,
) -> EstateResult<(StatusCode, Json<Schedule>)> {
    auth::guard(state.auth.as_ref(), &headers, &AuthPolicy::Authenticated).await?;

    let schedule = state.schedules.create(new).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Body for PUT /schedules/{id}/status
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ScheduleStatus,
}

/// PUT /schedules/{id}/status — admin only; enforces permitted transitions
pub async fn set_schedule_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> EstateResult<Json<Schedule>> {
    auth::guard(state.auth.as_ref(), &headers, &SCHEDULE_ADMIN).await?;

    let schedule = state.schedules.set_status(&id, update.status).await?;
    tracing::info!(schedule = %id, status = %schedule.status, "schedule status updated");
    Ok(Json(schedule))
}

/// DELETE /schedules/{id} — admin only
pub async fn delete_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> EstateResult<StatusCode> {
    auth::guard(state.auth.as_ref(), &headers, &SCHEDULE_ADMIN).await?;

    state.schedules.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
