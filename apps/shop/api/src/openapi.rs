//! OpenAPI documentation configuration

use utoipa::OpenApi;

use crate::api::{carts::CartsApiDoc, orders::OrdersApiDoc, promotions::PromotionsApiDoc};

/// Combined OpenAPI documentation for the Shop API
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Sample storefront: product catalogue with ETag concurrency, file storage and placeholder carts, orders and promotions",
        license(name = "MIT")
    ),
    nest(
        (path = "/api/products", api = domain_products::handlers::ApiDoc),
        (path = "/api/files", api = domain_files::handlers::ApiDoc),
        (path = "/api/carts", api = CartsApiDoc),
        (path = "/api/orders", api = OrdersApiDoc),
        (path = "/api/promotions", api = PromotionsApiDoc)
    )
)]
pub struct ApiDoc;
