use axum_helpers::EntityTag;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter, ProductPage, ProductQuery, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List active products; paging and sort parameters are clamped first
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<ProductPage> {
        query.validate()?;
        self.repository.list(ProductFilter::from(query)).await
    }

    /// Get an active product by ID
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// Replace a product when one of `if_match` weakly matches its current
    /// ETag.
    ///
    /// The version read here is also the one the write is conditioned on, so
    /// a writer that commits in between turns this call into `Conflict`.
    pub async fn update_product(
        &self,
        id: i32,
        if_match: &[EntityTag],
        input: UpdateProduct,
    ) -> ProductResult<Product> {
        input.validate()?;

        let current = self.get_product(id).await?;
        let current_etag = current.etag();
        if !if_match.iter().any(|tag| tag.weak_eq(&current_etag)) {
            return Err(ProductError::PreconditionFailed(id));
        }

        self.repository.update(id, current.row_version, input).await
    }

    /// Soft delete by default; `hard` removes the row whether or not it was
    /// already soft-deleted.
    pub async fn delete_product(&self, id: i32, hard: bool) -> ProductResult<()> {
        let deleted = if hard {
            self.repository.hard_delete(id).await?
        } else {
            self.repository.soft_delete(id).await?
        };

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    /// Idempotent: an active product restores successfully without change.
    pub async fn restore_product(&self, id: i32) -> ProductResult<()> {
        if !self.repository.restore(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}
