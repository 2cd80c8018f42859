use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{EquipmentId, EquipmentStatus, JobId, JobStatus};
use super::repository::{EquipmentRepository, JobRepository};
use super::service::{ListingError, ListingService};
use crate::marketplace::identity::router::require_actor;
use crate::marketplace::identity::ActorResolver;

/// Shared state for the listing endpoints.
pub struct ListingsRouterState<E, J, R> {
    pub listings: Arc<ListingService<E, J>>,
    pub actors: Arc<R>,
}

/// Router builder for equipment and job listings.
pub fn listings_router<E, J, R>(state: Arc<ListingsRouterState<E, J, R>>) -> Router
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    Router::new()
        .route(
            "/api/v1/equipment",
            get(available_equipment_handler::<E, J, R>).post(create_equipment_handler::<E, J, R>),
        )
        .route("/api/v1/equipment/mine", get(my_equipment_handler::<E, J, R>))
        .route(
            "/api/v1/equipment/:id/status",
            patch(equipment_status_handler::<E, J, R>),
        )
        .route(
            "/api/v1/jobs",
            get(open_jobs_handler::<E, J, R>).post(post_job_handler::<E, J, R>),
        )
        .route("/api/v1/jobs/mine", get(my_jobs_handler::<E, J, R>))
        .route("/api/v1/jobs/:id/status", patch(job_status_handler::<E, J, R>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EquipmentStatusRequest {
    pub(crate) status: EquipmentStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobStatusRequest {
    pub(crate) status: JobStatus,
}

pub(crate) async fn available_equipment_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    match state.listings.available_equipment() {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn create_equipment_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
    headers: HeaderMap,
    axum::Json(listing): axum::Json<super::domain::NewEquipment>,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.listings.create_equipment(actor, listing) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn my_equipment_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
    headers: HeaderMap,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.listings.equipment_by_owner(actor) {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn equipment_status_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<EquipmentStatusRequest>,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state
        .listings
        .set_equipment_status(actor, EquipmentId(id), request.status)
    {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn open_jobs_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    match state.listings.open_jobs() {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn post_job_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
    headers: HeaderMap,
    axum::Json(job): axum::Json<super::domain::NewLabourJob>,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.listings.post_job(actor, job) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn my_jobs_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
    headers: HeaderMap,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.listings.jobs_by_farmer(actor) {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn job_status_handler<E, J, R>(
    State(state): State<Arc<ListingsRouterState<E, J, R>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<JobStatusRequest>,
) -> Response
where
    E: EquipmentRepository + 'static,
    J: JobRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.listings.set_job_status(actor, JobId(id), request.status) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

fn listing_error_response(err: ListingError) -> Response {
    let status = match &err {
        ListingError::NotFound => StatusCode::NOT_FOUND,
        ListingError::Forbidden => StatusCode::FORBIDDEN,
        ListingError::Validation(_) => StatusCode::BAD_REQUEST,
        ListingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
