use axum::{
    Json, Router,
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, IdPath, IfMatch, IfNoneMatch, ValidatedJson,
    ValidatedQuery, X_PAGE, X_PAGE_SIZE, X_TOTAL_COUNT,
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, PreconditionFailedResponse,
        PreconditionRequiredResponse,
    },
};
use observability::ProductMetrics;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, DeleteParams, ProductDto, ProductQuery, SortBy, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

const TAG: &str = "products";
const RESTORE_SUFFIX: &str = ":restore";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        restore_product,
        restore_product_action,
    ),
    components(
        schemas(ProductDto, CreateProduct, UpdateProduct, SortBy),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            ConflictResponse,
            PreconditionFailedResponse,
            PreconditionRequiredResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalogue with ETag concurrency control")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .post(restore_product_action),
        )
        .route("/{id}/restore", post(restore_product))
        .with_state(shared_service)
}

/// List active products
///
/// Paging metadata is returned in `X-Total-Count`, `X-Page` and `X-Page-Size`.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ProductQuery),
    responses(
        (status = 200, description = "Page of products", body = Vec<ProductDto>,
            headers(
                ("X-Total-Count" = u64, description = "Products matching the filters"),
                ("X-Page" = u64, description = "Page returned"),
                ("X-Page-Size" = u64, description = "Page size applied")
            )
        ),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ProductQuery>,
) -> ProductResult<impl IntoResponse> {
    let page = service.list_products(query).await?;
    ProductMetrics::record_listed(page.items.len(), page.total);

    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(page.total));
    headers.insert(X_PAGE, HeaderValue::from(page.page));
    headers.insert(X_PAGE_SIZE, HeaderValue::from(page.page_size));

    let items: Vec<ProductDto> = page.items.into_iter().map(ProductDto::from).collect();
    Ok((headers, Json(items)))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductDto,
            headers(
                ("ETag" = String, description = "Entity tag of the new product"),
                ("Location" = String, description = "URL of the new product")
            )
        ),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    ProductMetrics::record_created();

    let etag = product.etag();
    let dto = ProductDto::from(product);
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), dto.id);
    let location =
        HeaderValue::try_from(location).map_err(|e| ProductError::Internal(e.to_string()))?;

    AuditEvent::new(
        "product.create",
        Some(format!("product:{}", dto.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({
        "name": dto.name,
        "price": dto.price,
        "in_stock": dto.in_stock,
    }))
    .log();

    Ok((
        StatusCode::CREATED,
        [(header::ETAG, etag.to_header_value()), (header::LOCATION, location)],
        Json(dto),
    ))
}

/// Get an active product by ID
///
/// Answers 304 when `If-None-Match` lists the current ETag or is `*`.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("If-None-Match" = Option<String>, Header, description = "Cached ETag(s)")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto,
            headers(("ETag" = String, description = "Current entity tag"))
        ),
        (status = 304, description = "Cached copy is current",
            headers(("ETag" = String, description = "Current entity tag"))
        ),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath<i32>,
    if_none_match: IfNoneMatch,
) -> ProductResult<Response> {
    let product = service.get_product(id).await?;
    let etag = product.etag();

    if if_none_match.matches(&etag) {
        ProductMetrics::record_precondition("not_modified");
        let headers = [(header::ETAG, etag.to_header_value())];
        return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
    }

    let dto = ProductDto::from(product);
    Ok(([(header::ETAG, etag.to_header_value())], Json(dto)).into_response())
}

fn record_update_rejection(err: &ProductError, id: i32, headers: &HeaderMap) {
    match err {
        ProductError::PreconditionFailed(_) => ProductMetrics::record_precondition("failed"),
        ProductError::Conflict(_) => ProductMetrics::record_conflict(),
        _ => return,
    }

    AuditEvent::new(
        "product.update",
        Some(format!("product:{}", id)),
        AuditOutcome::Failure,
    )
    .with_request_headers(headers)
    .with_details(json!({ "reason": err.to_string() }))
    .log();
}

/// Replace a product
///
/// Requires `If-Match` with the ETag last seen by the client.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("If-Match" = String, Header, description = "ETag last seen by the client")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 204, description = "Product updated",
            headers(("ETag" = String, description = "New entity tag"))
        ),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 412, response = PreconditionFailedResponse),
        (status = 428, response = PreconditionRequiredResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath<i32>,
    IfMatch(if_match): IfMatch,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service
        .update_product(id, &if_match, input)
        .await
        .inspect_err(|err| record_update_rejection(err, id, &headers))?;
    ProductMetrics::record_updated();

    let etag = product.etag();
    AuditEvent::new(
        "product.update",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "etag": etag.to_string() }))
    .log();

    Ok((StatusCode::NO_CONTENT, [(header::ETAG, etag.to_header_value())]))
}

/// Delete a product
///
/// Soft delete by default; `hard=true` removes the row permanently.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID"),
        DeleteParams
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath<i32>,
    ValidatedQuery(params): ValidatedQuery<DeleteParams>,
) -> ProductResult<StatusCode> {
    service.delete_product(id, params.hard).await?;
    ProductMetrics::record_deleted(params.hard);

    AuditEvent::new(
        "product.delete",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "hard": params.hard }))
    .log();

    Ok(StatusCode::NO_CONTENT)
}

async fn restore(
    service: &ProductService<impl ProductRepository>,
    headers: &HeaderMap,
    id: i32,
) -> ProductResult<StatusCode> {
    service.restore_product(id).await?;
    ProductMetrics::record_restored();

    AuditEvent::new(
        "product.restore",
        Some(format!("product:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Restore a soft-deleted product
///
/// Succeeds without change when the product is already active.
#[utoipa::path(
    post,
    path = "/{id}/restore",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product restored or already active"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn restore_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath<i32>,
) -> ProductResult<StatusCode> {
    restore(&service, &headers, id).await
}

/// Restore a soft-deleted product (custom-method form)
#[utoipa::path(
    post,
    path = "/{id}:restore",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product restored or already active"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn restore_product_action<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    headers: HeaderMap,
    Path(segment): Path<String>,
) -> Result<StatusCode, AppError> {
    // POST /{id} without the `:restore` suffix is not a route
    let raw_id = segment
        .strip_suffix(RESTORE_SUFFIX)
        .ok_or_else(|| AppError::NotFound(format!("No route for POST /{}", segment)))?;
    let id = raw_id
        .parse::<i32>()
        .map_err(|_| AppError::InvalidPathParameter(format!("Invalid id: {}", raw_id)))?;

    Ok(restore(&service, &headers, id).await?)
}
