//! Cart endpoints (placeholder data)

use axum::{Json, Router, routing::get};
use axum_helpers::{IdPath, errors::responses::BadRequestPathResponse};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

const TAG: &str = "carts";

#[derive(OpenApi)]
#[openapi(
    paths(index, get_cart_items),
    components(schemas(CartItems), responses(BadRequestPathResponse)),
    tags((name = TAG, description = "Shopping carts (placeholder)"))
)]
pub struct CartsApiDoc;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CartItems {
    pub cart_id: i32,
    pub items: Vec<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/{cart_id}/items", get(get_cart_items))
}

/// Liveness message for the carts resource
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses((status = 200, description = "Carts are reachable", body = String, content_type = "text/plain"))
)]
async fn index() -> &'static str {
    "CartsController is working!"
}

/// Items in a cart
#[utoipa::path(
    get,
    path = "/{cart_id}/items",
    tag = TAG,
    params(("cart_id" = i32, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart items", body = CartItems),
        (status = 400, response = BadRequestPathResponse)
    )
)]
async fn get_cart_items(IdPath(cart_id): IdPath<i32>) -> Json<CartItems> {
    Json(CartItems {
        cart_id,
        items: vec!["Item1".to_string(), "Item2".to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn call(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_index() {
        let (status, body) = call("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"CartsController is working!");
    }

    #[tokio::test]
    async fn test_cart_items() {
        let (status, body) = call("/42/items").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "CartId": 42, "Items": ["Item1", "Item2"] })
        );
    }

    #[tokio::test]
    async fn test_cart_items_invalid_id() {
        let (status, _) = call("/abc/items").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
