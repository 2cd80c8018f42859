use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::repository::MarketPriceRepository;
use super::service::MarketBoard;

/// Router builder for the public price board.
pub fn market_router<M>(board: Arc<MarketBoard<M>>) -> Router
where
    M: MarketPriceRepository + 'static,
{
    Router::new()
        .route("/api/v1/market/prices", get(quotes_handler::<M>))
        .with_state(board)
}

pub(crate) async fn quotes_handler<M>(State(board): State<Arc<MarketBoard<M>>>) -> Response
where
    M: MarketPriceRepository + 'static,
{
    match board.quotes() {
        Ok(quotes) => (StatusCode::OK, axum::Json(quotes)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
