use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ProductFilter, ProductPage, SortBy, UpdateProduct};

/// Repository trait for Product persistence.
///
/// Every mutation bumps `row_version`. Reads other than `restore` and
/// `hard_delete` never see soft-deleted rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of active products matching `filter`, plus the total match count
    async fn list(&self, filter: ProductFilter) -> ProductResult<ProductPage>;

    /// Get an active product by ID
    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Replace all fields if the stored row version still equals
    /// `expected_version`.
    ///
    /// Fails with `NotFound` when the row is absent or soft-deleted and with
    /// `Conflict` when another writer bumped the version first.
    async fn update(
        &self,
        id: i32,
        expected_version: i64,
        input: UpdateProduct,
    ) -> ProductResult<Product>;

    /// Mark an active product deleted. `false` when no active row exists.
    async fn soft_delete(&self, id: i32) -> ProductResult<bool>;

    /// Physically remove the row, deleted or not. `false` when absent.
    async fn hard_delete(&self, id: i32) -> ProductResult<bool>;

    /// Clear the deleted flag. `true` when the row exists, including when it
    /// was already active.
    async fn restore(&self, id: i32) -> ProductResult<bool>;
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    if product.is_deleted {
        return false;
    }
    if let Some(ref search) = filter.search {
        if !product.name.contains(search.as_str()) {
            return false;
        }
    }
    if let Some(min) = filter.min_price {
        if product.price < min {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if product.price > max {
            return false;
        }
    }
    if let Some(in_stock) = filter.in_stock {
        if product.in_stock != in_stock {
            return false;
        }
    }
    true
}

fn compare(a: &Product, b: &Product, filter: &ProductFilter) -> Ordering {
    let primary = match filter.sort_by {
        SortBy::Name => a.name.cmp(&b.name),
        SortBy::Price => a.price.cmp(&b.price),
    };
    let primary = if filter.descending {
        primary.reverse()
    } else {
        primary
    };
    primary.then(a.id.cmp(&b.id))
}

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    products: HashMap<i32, Product>,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, filter: ProductFilter) -> ProductResult<ProductPage> {
        let store = self.store.read().await;

        let mut matching: Vec<Product> = store
            .products
            .values()
            .filter(|p| matches_filter(p, &filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(a, b, &filter));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size as usize)
            .collect();

        Ok(ProductPage {
            items,
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).filter(|p| !p.is_deleted).cloned())
    }

    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        store.next_id += 1;

        let now = Utc::now();
        let product = Product {
            id: store.next_id,
            name: input.name,
            price: input.price,
            in_stock: input.in_stock,
            is_deleted: false,
            created_utc: now,
            updated_utc: now,
            row_version: 1,
        };
        store.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update(
        &self,
        id: i32,
        expected_version: i64,
        input: UpdateProduct,
    ) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        let product = store
            .products
            .get_mut(&id)
            .filter(|p| !p.is_deleted)
            .ok_or(ProductError::NotFound(id))?;

        if product.row_version != expected_version {
            return Err(ProductError::Conflict(id));
        }

        product.name = input.name;
        product.price = input.price;
        product.in_stock = input.in_stock;
        product.updated_utc = Utc::now();
        product.row_version += 1;

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn soft_delete(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        match store.products.get_mut(&id).filter(|p| !p.is_deleted) {
            Some(product) => {
                product.is_deleted = true;
                product.updated_utc = Utc::now();
                product.row_version += 1;
                tracing::info!(product_id = id, "Soft-deleted product");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn hard_delete(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn restore(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        match store.products.get_mut(&id) {
            Some(product) if product.is_deleted => {
                product.is_deleted = false;
                product.updated_utc = Utc::now();
                product.row_version += 1;
                tracing::info!(product_id = id, "Restored product");
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }
}
