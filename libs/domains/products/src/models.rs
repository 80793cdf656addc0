use axum_helpers::EntityTag;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 200;

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Name must not be blank".into()));
    }
    Ok(())
}

fn validate_non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("range").with_message("Price must be >= 0".into()));
    }
    Ok(())
}

fn validate_price_range(query: &ProductQuery) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(ValidationError::new("price_range")
                .with_message("minPrice must not exceed maxPrice".into()));
        }
    }
    Ok(())
}

/// Product as stored, including soft-delete state and row version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub in_stock: bool,
    pub is_deleted: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub row_version: i64,
}

impl Product {
    pub fn etag(&self) -> EntityTag {
        EntityTag::from_version(self.row_version)
    }
}

/// Wire representation of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ProductDto {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Keyboard")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 29.99)]
    pub price: Decimal,
    pub in_stock: bool,
    /// Same value as the `ETag` response header
    #[serde(rename = "ETag")]
    #[schema(example = "W/\"0000000000000001\"")]
    pub etag: String,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        let etag = product.etag().to_string();
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            in_stock: product.in_stock,
            etag,
        }
    }
}

/// Payload for creating a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateProduct {
    #[serde(alias = "name")]
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Widget", max_length = 200)]
    pub name: String,

    #[serde(alias = "price", with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(example = 9.99, minimum = 0)]
    pub price: Decimal,

    #[serde(alias = "inStock", default)]
    pub in_stock: bool,
}

/// Full replacement payload for `PUT`; same rules as [`CreateProduct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateProduct {
    #[serde(alias = "name")]
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Widget2", max_length = 200)]
    pub name: String,

    #[serde(alias = "price", with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(example = 12.5, minimum = 0)]
    pub price: Decimal,

    #[serde(alias = "inStock", default)]
    pub in_stock: bool,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortBy {
    #[default]
    Name,
    Price,
}

/// Raw list query string, before clamping.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "validate_price_range"))]
pub struct ProductQuery {
    /// Case-sensitive substring of the product name
    #[serde(alias = "name")]
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    /// `name` (default) or `price`; unknown values fall back to `name`
    pub sort_by: Option<String>,
    #[serde(default)]
    pub desc: bool,
    /// 1-based, values below 1 are treated as 1
    pub page: Option<i64>,
    /// Clamped to [1, 200], default 20
    pub page_size: Option<i64>,
}

/// Normalised list filter handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub sort_by: SortBy,
    pub descending: bool,
    pub page: u64,
    pub page_size: u64,
}

/// Postgres binds OFFSET as BIGINT.
const MAX_OFFSET: u64 = i64::MAX as u64;

impl ProductFilter {
    /// Rows to skip; pages past the end yield an empty page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size).min(MAX_OFFSET)
    }
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductQuery::default().into()
    }
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let page_size = query
            .page_size
            .map(|size| size.clamp(1, MAX_PAGE_SIZE as i64) as u64)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let sort_by = query
            .sort_by
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_default();

        Self {
            search: query.search.filter(|s| !s.is_empty()),
            min_price: query.min_price,
            max_price: query.max_price,
            in_stock: query.in_stock,
            sort_by,
            descending: query.desc,
            page,
            page_size,
        }
    }
}

/// One page of products plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// `?hard=true` switches DELETE to a physical delete.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteParams {
    #[serde(default)]
    pub hard: bool,
}
