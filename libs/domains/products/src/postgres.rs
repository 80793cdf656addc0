use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, UpdateMany,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{CreateProduct, Product, ProductFilter, ProductPage, SortBy, UpdateProduct},
    repository::ProductRepository,
};

/// The new version is computed by the database in the same statement as the write.
const BUMP_ROW_VERSION: &str = "row_version + 1";

/// Full-field replacement that only applies while the row is active and
/// still carries `expected_version`.
fn versioned_update(
    id: i32,
    expected_version: i64,
    input: UpdateProduct,
) -> UpdateMany<entity::Entity> {
    entity::Entity::update_many()
        .col_expr(entity::Column::Name, Expr::value(input.name))
        .col_expr(entity::Column::Price, Expr::value(input.price))
        .col_expr(entity::Column::InStock, Expr::value(input.in_stock))
        .col_expr(entity::Column::UpdatedUtc, Expr::value(now()))
        .col_expr(entity::Column::RowVersion, Expr::cust(BUMP_ROW_VERSION))
        .filter(entity::Column::Id.eq(id))
        .filter(entity::Column::RowVersion.eq(expected_version))
        .filter(entity::Column::IsDeleted.eq(false))
}

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: ProductFilter) -> ProductResult<ProductPage> {
        let mut query = entity::Entity::find_active();

        if let Some(ref search) = filter.search {
            query = query.filter(entity::Column::Name.contains(search.as_str()));
        }

        if let Some(min_price) = filter.min_price {
            query = query.filter(entity::Column::Price.gte(min_price));
        }

        if let Some(max_price) = filter.max_price {
            query = query.filter(entity::Column::Price.lte(max_price));
        }

        if let Some(in_stock) = filter.in_stock {
            query = query.filter(entity::Column::InStock.eq(in_stock));
        }

        let total = query.clone().count(&self.db).await?;

        let order = if filter.descending {
            Order::Desc
        } else {
            Order::Asc
        };
        let sort_column = match filter.sort_by {
            SortBy::Name => entity::Column::Name,
            SortBy::Price => entity::Column::Price,
        };

        let models = query
            .order_by(sort_column, order)
            .order_by_asc(entity::Column::Id)
            .offset(filter.offset())
            .limit(filter.page_size)
            .all(&self.db)
            .await?;

        Ok(ProductPage {
            items: models.into_iter().map(Into::into).collect(),
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_active()
            .filter(entity::Column::Id.eq(id))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let timestamp = now();
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            price: Set(input.price),
            in_stock: Set(input.in_stock),
            is_deleted: Set(false),
            created_utc: Set(timestamp),
            updated_utc: Set(timestamp),
            row_version: Set(1),
        };

        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn update(
        &self,
        id: i32,
        expected_version: i64,
        input: UpdateProduct,
    ) -> ProductResult<Product> {
        let txn = self.db.begin().await?;

        let result = versioned_update(id, expected_version, input)
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            let still_active = entity::Entity::find_active()
                .filter(entity::Column::Id.eq(id))
                .one(&txn)
                .await?
                .is_some();
            txn.rollback().await?;

            return Err(if still_active {
                tracing::warn!(product_id = id, expected_version, "Concurrent update rejected");
                ProductError::Conflict(id)
            } else {
                ProductError::NotFound(id)
            });
        }

        let model = entity::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        txn.commit().await?;

        tracing::info!(product_id = id, row_version = model.row_version, "Updated product");
        Ok(model.into())
    }

    async fn soft_delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::IsDeleted, Expr::value(true))
            .col_expr(entity::Column::UpdatedUtc, Expr::value(now()))
            .col_expr(entity::Column::RowVersion, Expr::cust(BUMP_ROW_VERSION))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Soft-deleted product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn hard_delete(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::IsDeleted, Expr::value(false))
            .col_expr(entity::Column::UpdatedUtc, Expr::value(now()))
            .col_expr(entity::Column::RowVersion, Expr::cust(BUMP_ROW_VERSION))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::IsDeleted.eq(true))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Restored product");
            return Ok(true);
        }

        let exists = entity::Entity::find_with_deleted()
            .filter(entity::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .is_some();
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn model(id: i32, row_version: i64, is_deleted: bool) -> entity::Model {
        let now = Utc::now().into();
        entity::Model {
            id,
            name: "Keyboard".to_string(),
            price: Decimal::new(2999, 2),
            in_stock: true,
            is_deleted,
            created_utc: now,
            updated_utc: now,
            row_version,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn update_input() -> UpdateProduct {
        UpdateProduct {
            name: "Keyboard Pro".to_string(),
            price: Decimal::new(3999, 2),
            in_stock: false,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, 3, false)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.get_by_id(1).await.unwrap().unwrap();

        assert_eq!(product.id, 1);
        assert_eq!(product.row_version, 3);
        assert_eq!(product.price, Decimal::new(2999, 2));
    }

    #[tokio::test]
    async fn test_create_inserts_with_initial_version() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(6, 1, false)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo
            .create(CreateProduct {
                name: "Keyboard".to_string(),
                price: Decimal::new(2999, 2),
                in_stock: true,
            })
            .await
            .unwrap();

        assert_eq!(product.id, 6);
        assert_eq!(product.row_version, 1);
    }

    #[test]
    fn test_versioned_update_bumps_and_guards_row_version() {
        let sql = versioned_update(1, 4, update_input())
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""row_version" = row_version + 1"#), "{sql}");
        assert!(sql.contains(r#""row_version" = 4"#), "{sql}");
        assert!(sql.contains(r#""is_deleted" = FALSE"#), "{sql}");
        assert!(sql.contains(r#""id" = 1"#), "{sql}");
    }

    #[tokio::test]
    async fn test_update_returns_reloaded_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .append_query_results([vec![model(1, 5, false)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.update(1, 4, update_input()).await.unwrap();

        assert_eq!(product.row_version, 5);
    }

    #[tokio::test]
    async fn test_update_reports_conflict_when_row_still_active() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .append_query_results([vec![model(1, 6, false)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.update(1, 4, update_input()).await;

        assert!(matches!(result, Err(ProductError::Conflict(1))));
    }

    #[tokio::test]
    async fn test_update_reports_not_found_when_row_gone() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.update(1, 4, update_input()).await;

        assert!(matches!(result, Err(ProductError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_soft_delete_reports_affected_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.soft_delete(1).await.unwrap());
        assert!(!repo.soft_delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_restore_already_active_row_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0), exec(0)])
            .append_query_results([vec![model(1, 2, false)], vec![]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.restore(1).await.unwrap());
        assert!(!repo.restore(2).await.unwrap());
    }
}
