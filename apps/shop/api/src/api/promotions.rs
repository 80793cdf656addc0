//! Promotion endpoints (placeholder data)

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

const TAG: &str = "promotions";

#[derive(OpenApi)]
#[openapi(
    paths(list_promotions),
    tags((name = TAG, description = "Promotions (placeholder)"))
)]
pub struct PromotionsApiDoc;

pub fn router() -> Router {
    Router::new().route("/", get(list_promotions))
}

/// Active promotions
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses((status = 200, description = "Promotion names", body = Vec<String>))
)]
async fn list_promotions() -> Json<[&'static str; 2]> {
    Json(["Promotion1", "Promotion2"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_list_promotions() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"["Promotion1","Promotion2"]"#);
    }
}
