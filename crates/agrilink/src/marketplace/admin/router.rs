use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::AuditStore;
use super::service::{AdminError, AdminService};

/// Router builder for the audit endpoints. Credentials travel in the body
/// of every request; there is no admin session.
pub fn admin_router<T>(service: Arc<AdminService<T>>) -> Router
where
    T: AuditStore + 'static,
{
    Router::new()
        .route("/api/v1/admin/login", post(login_handler::<T>))
        .route("/api/v1/admin/records", post(records_handler::<T>))
        .route("/api/v1/admin/delete", post(delete_handler::<T>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminCredentialsRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminDeleteRequest {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) table_name: String,
    pub(crate) record_id: u64,
}

pub(crate) async fn login_handler<T>(
    State(service): State<Arc<AdminService<T>>>,
    axum::Json(request): axum::Json<AdminCredentialsRequest>,
) -> Response
where
    T: AuditStore + 'static,
{
    match service.login(&request.username, &request.password) {
        Ok(()) => {
            let payload = json!({ "admin": { "username": request.username } });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => admin_error_response(err),
    }
}

pub(crate) async fn records_handler<T>(
    State(service): State<Arc<AdminService<T>>>,
    axum::Json(request): axum::Json<AdminCredentialsRequest>,
) -> Response
where
    T: AuditStore + 'static,
{
    match service.all_records(&request.username, &request.password) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => admin_error_response(err),
    }
}

pub(crate) async fn delete_handler<T>(
    State(service): State<Arc<AdminService<T>>>,
    axum::Json(request): axum::Json<AdminDeleteRequest>,
) -> Response
where
    T: AuditStore + 'static,
{
    match service.delete_record(
        &request.username,
        &request.password,
        &request.table_name,
        request.record_id,
    ) {
        Ok(()) => {
            let payload = json!({ "message": "record deleted" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => admin_error_response(err),
    }
}

fn admin_error_response(err: AdminError) -> Response {
    let status = match &err {
        AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
        AdminError::InvalidTable { .. } => StatusCode::BAD_REQUEST,
        AdminError::NotFound => StatusCode::NOT_FOUND,
        AdminError::Hashing(_) | AdminError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
