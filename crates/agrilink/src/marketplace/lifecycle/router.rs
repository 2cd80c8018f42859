use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationRequest, BookingId, BookingRequest, DecisionOutcome};
use super::repository::{ApplicationRepository, BookingRepository, ResourceDirectory};
use super::service::{LifecycleError, LifecycleService};
use crate::marketplace::identity::router::require_actor;
use crate::marketplace::identity::ActorResolver;
use crate::marketplace::listings::JobId;

/// Shared state for the lifecycle endpoints.
pub struct LifecycleRouterState<B, A, D, R> {
    pub lifecycle: Arc<LifecycleService<B, A, D>>,
    pub actors: Arc<R>,
}

/// Router builder for booking and application requests.
pub fn lifecycle_router<B, A, D, R>(state: Arc<LifecycleRouterState<B, A, D, R>>) -> Router
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    Router::new()
        .route("/api/v1/bookings", post(request_booking_handler::<B, A, D, R>))
        .route(
            "/api/v1/bookings/incoming",
            get(incoming_bookings_handler::<B, A, D, R>),
        )
        .route("/api/v1/bookings/mine", get(my_bookings_handler::<B, A, D, R>))
        .route(
            "/api/v1/bookings/:id/decision",
            patch(decide_booking_handler::<B, A, D, R>),
        )
        .route(
            "/api/v1/applications",
            post(request_application_handler::<B, A, D, R>),
        )
        .route(
            "/api/v1/applications/incoming",
            get(incoming_applications_handler::<B, A, D, R>),
        )
        .route(
            "/api/v1/applications/mine",
            get(my_applications_handler::<B, A, D, R>),
        )
        .route(
            "/api/v1/applications/:id/decision",
            patch(decide_application_handler::<B, A, D, R>),
        )
        .route(
            "/api/v1/jobs/:id/applications",
            get(job_applications_handler::<B, A, D, R>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) outcome: DecisionOutcome,
}

pub(crate) async fn request_booking_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.request_booking(actor, request) {
        Ok(booking) => (StatusCode::CREATED, axum::Json(booking)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn incoming_bookings_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    headers: HeaderMap,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.bookings_for_owner(actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn my_bookings_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    headers: HeaderMap,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.bookings_for_requester(actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn decide_booking_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state
        .lifecycle
        .decide_booking(actor, BookingId(id), request.outcome)
    {
        Ok(booking) => (StatusCode::OK, axum::Json(booking)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn request_application_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.request_application(actor, request) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn incoming_applications_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    headers: HeaderMap,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.applications_for_owner(actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn my_applications_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    headers: HeaderMap,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.applications_for_requester(actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn decide_application_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state
        .lifecycle
        .decide_application(actor, ApplicationId(id), request.outcome)
    {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn job_applications_handler<B, A, D, R>(
    State(state): State<Arc<LifecycleRouterState<B, A, D, R>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    B: BookingRepository + 'static,
    A: ApplicationRepository + 'static,
    D: ResourceDirectory + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.lifecycle.applications_for_job(actor, JobId(id)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

fn lifecycle_error_response(err: LifecycleError) -> Response {
    let status = match &err {
        LifecycleError::ResourceNotFound => StatusCode::NOT_FOUND,
        LifecycleError::Forbidden => StatusCode::FORBIDDEN,
        LifecycleError::InvalidTransition { .. } | LifecycleError::DuplicateApplication => {
            StatusCode::CONFLICT
        }
        LifecycleError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
