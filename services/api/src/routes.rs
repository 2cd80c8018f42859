use crate::infra::{AppState, MemoryStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use agrilink::config::AdminConfig;
use agrilink::error::AppError;
use agrilink::marketplace::admin::{admin_router, AdminCredentials, AdminService};
use agrilink::marketplace::identity::{identity_router, IdentityService};
use agrilink::marketplace::lifecycle::{lifecycle_router, LifecycleRouterState, LifecycleService};
use agrilink::marketplace::listings::{listings_router, ListingService, ListingsRouterState};
use agrilink::marketplace::market::{market_router, MarketBoard};
use agrilink::marketplace::profiles::{profiles_router, ProfileService, ProfilesRouterState};

pub(crate) type Identity = IdentityService<MemoryStore, MemoryStore>;

/// Every marketplace service, wired to the one shared store.
pub(crate) struct Services {
    pub(crate) identity: Arc<Identity>,
    pub(crate) listings: Arc<ListingService<MemoryStore, MemoryStore>>,
    pub(crate) lifecycle: Arc<LifecycleService<MemoryStore, MemoryStore, MemoryStore>>,
    pub(crate) profiles: Arc<ProfileService<MemoryStore>>,
    pub(crate) market: Arc<MarketBoard<MemoryStore>>,
    pub(crate) admin: Arc<AdminService<MemoryStore>>,
}

pub(crate) fn build_services(
    store: Arc<MemoryStore>,
    admin: &AdminConfig,
) -> Result<Services, AppError> {
    let credentials = AdminCredentials::new(&admin.username, &admin.password)?;
    Ok(Services {
        identity: Arc::new(IdentityService::new(store.clone(), store.clone())),
        listings: Arc::new(ListingService::new(store.clone(), store.clone())),
        lifecycle: Arc::new(LifecycleService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        profiles: Arc::new(ProfileService::new(store.clone())),
        market: Arc::new(MarketBoard::new(store.clone())),
        admin: Arc::new(AdminService::new(store, credentials)),
    })
}

pub(crate) fn marketplace_routes(services: &Services) -> axum::Router {
    identity_router(services.identity.clone())
        .merge(listings_router(Arc::new(ListingsRouterState {
            listings: services.listings.clone(),
            actors: services.identity.clone(),
        })))
        .merge(lifecycle_router(Arc::new(LifecycleRouterState {
            lifecycle: services.lifecycle.clone(),
            actors: services.identity.clone(),
        })))
        .merge(profiles_router(Arc::new(ProfilesRouterState {
            profiles: services.profiles.clone(),
            actors: services.identity.clone(),
        })))
        .merge(market_router(services.market.clone()))
        .merge(admin_router(services.admin.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
