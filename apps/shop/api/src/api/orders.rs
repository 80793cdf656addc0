//! Order endpoints (placeholder data)

use axum::{Json, Router, routing::get};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

const TAG: &str = "orders";

#[derive(OpenApi)]
#[openapi(
    paths(count),
    components(schemas(OrdersCount)),
    tags((name = TAG, description = "Orders (placeholder)"))
)]
pub struct OrdersApiDoc;

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct OrdersCount {
    pub orders_count: u64,
}

pub fn router() -> Router {
    Router::new().route("/count", get(count))
}

/// Number of orders placed
#[utoipa::path(
    get,
    path = "/count",
    tag = TAG,
    responses((status = 200, description = "Order count", body = OrdersCount))
)]
async fn count() -> Json<OrdersCount> {
    Json(OrdersCount::default())
}
