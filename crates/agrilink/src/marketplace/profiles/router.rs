use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde_json::json;

use super::domain::ProfileDraft;
use super::repository::ProfileRepository;
use super::service::{ProfileError, ProfileService};
use crate::marketplace::identity::router::require_actor;
use crate::marketplace::identity::{ActorResolver, UserId};

/// Shared state for the profile endpoints.
pub struct ProfilesRouterState<P, R> {
    pub profiles: Arc<ProfileService<P>>,
    pub actors: Arc<R>,
}

/// Router builder for labourer profiles.
pub fn profiles_router<P, R>(state: Arc<ProfilesRouterState<P, R>>) -> Router
where
    P: ProfileRepository + 'static,
    R: ActorResolver + 'static,
{
    Router::new()
        .route("/api/v1/profile", put(upsert_profile_handler::<P, R>))
        .route(
            "/api/v1/profiles/:labourer_id",
            get(profile_handler::<P, R>),
        )
        .with_state(state)
}

pub(crate) async fn upsert_profile_handler<P, R>(
    State(state): State<Arc<ProfilesRouterState<P, R>>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<ProfileDraft>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ActorResolver + 'static,
{
    let actor = match require_actor(state.actors.as_ref(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match state.profiles.upsert_profile(actor, draft) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => profile_error_response(err),
    }
}

pub(crate) async fn profile_handler<P, R>(
    State(state): State<Arc<ProfilesRouterState<P, R>>>,
    Path(labourer_id): Path<u64>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ActorResolver + 'static,
{
    match state.profiles.profile(UserId(labourer_id)) {
        Ok(Some(profile)) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Ok(None) => profile_error_response(ProfileError::NotFound),
        Err(err) => profile_error_response(err),
    }
}

fn profile_error_response(err: ProfileError) -> Response {
    let status = match &err {
        ProfileError::Forbidden => StatusCode::FORBIDDEN,
        ProfileError::NotFound => StatusCode::NOT_FOUND,
        ProfileError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
