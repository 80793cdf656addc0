//! HTTP-level building blocks: CORS, security headers, entity tags and the
//! custom response headers shared by the resource routers.

pub mod cors;
pub mod etag;
pub mod security;

pub use cors::{cors_layer_from_env, create_cors_layer};
pub use etag::{EntityTag, EntityTagList, InvalidEntityTag};
pub use security::security_headers;

use axum::http::HeaderName;

/// Number of rows matching a list query, independent of paging.
pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");
pub const X_PAGE: HeaderName = HeaderName::from_static("x-page");
pub const X_PAGE_SIZE: HeaderName = HeaderName::from_static("x-page-size");
