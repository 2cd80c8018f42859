use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Actor, NewUser, SessionToken, UserRole};
use super::repository::{SessionStore, UserRepository};
use super::service::{ActorResolver, IdentityError, IdentityService};

/// Router builder exposing registration, login, and session endpoints.
pub fn identity_router<U, S>(service: Arc<IdentityService<U, S>>) -> Router
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<U, S>))
        .route("/api/v1/auth/login", post(login_handler::<U, S>))
        .route("/api/v1/auth/logout", post(logout_handler::<U, S>))
        .route("/api/v1/auth/me", get(me_handler::<U, S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) role: UserRole,
}

pub(crate) async fn register_handler<U, S>(
    State(service): State<Arc<IdentityService<U, S>>>,
    axum::Json(registration): axum::Json<NewUser>,
) -> Response
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    match service.register(registration) {
        Ok(user) => (StatusCode::CREATED, axum::Json(user.view())).into_response(),
        Err(err) => identity_error_response(err),
    }
}

pub(crate) async fn login_handler<U, S>(
    State(service): State<Arc<IdentityService<U, S>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    match service.login(&request.email, &request.password, request.role) {
        Ok((user, token)) => {
            let payload = json!({
                "token": token,
                "user": user.view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => identity_error_response(err),
    }
}

pub(crate) async fn logout_handler<U, S>(
    State(service): State<Arc<IdentityService<U, S>>>,
    headers: HeaderMap,
) -> Response
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized_response();
    };
    match service.logout(&SessionToken(token.to_string())) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => identity_error_response(err),
    }
}

pub(crate) async fn me_handler<U, S>(
    State(service): State<Arc<IdentityService<U, S>>>,
    headers: HeaderMap,
) -> Response
where
    U: UserRepository + 'static,
    S: SessionStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized_response();
    };
    match service.current_user(&SessionToken(token.to_string())) {
        Ok(Some(user)) => (StatusCode::OK, axum::Json(user.view())).into_response(),
        Ok(None) => unauthorized_response(),
        Err(err) => identity_error_response(err),
    }
}

fn identity_error_response(err: IdentityError) -> Response {
    let status = match &err {
        IdentityError::DuplicateEmail => StatusCode::CONFLICT,
        IdentityError::InvalidCredentials | IdentityError::RoleMismatch => {
            StatusCode::UNAUTHORIZED
        }
        IdentityError::MissingField { .. } => StatusCode::BAD_REQUEST,
        IdentityError::Hashing(_) | IdentityError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub(crate) fn unauthorized_response() -> Response {
    let payload = json!({ "error": "authentication required" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

/// Resolve the bearer token on a protected route, or produce the error
/// response the handler should return as-is.
pub(crate) fn require_actor<R>(actors: &R, headers: &HeaderMap) -> Result<Actor, Response>
where
    R: ActorResolver + ?Sized,
{
    let Some(token) = bearer_token(headers) else {
        return Err(unauthorized_response());
    };
    match actors.resolve_actor(token) {
        Ok(Some(actor)) => Ok(actor),
        Ok(None) => Err(unauthorized_response()),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}
