use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    pub in_stock: bool,
    pub is_deleted: bool,
    pub created_utc: DateTimeWithTimeZone,
    pub updated_utc: DateTimeWithTimeZone,
    /// Bumped by every mutating statement; source of the ETag.
    pub row_version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Default read path: soft-deleted rows are invisible.
    pub fn find_active() -> Select<Entity> {
        Self::find().filter(Column::IsDeleted.eq(false))
    }

    /// Administrative read path (restore, hard delete, conflict diagnosis).
    pub fn find_with_deleted() -> Select<Entity> {
        Self::find()
    }
}

impl From<Model> for crate::models::Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            in_stock: model.in_stock,
            is_deleted: model.is_deleted,
            created_utc: model.created_utc.into(),
            updated_utc: model.updated_utc.into(),
            row_version: model.row_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_find_active_filters_deleted_rows() {
        let sql = Entity::find_active().build(DbBackend::Postgres).to_string();
        assert!(sql.contains(r#""products"."is_deleted" = FALSE"#), "{sql}");
    }

    #[test]
    fn test_find_with_deleted_has_no_filter() {
        let sql = Entity::find_with_deleted()
            .build(DbBackend::Postgres)
            .to_string();
        assert!(!sql.contains("WHERE"), "{sql}");
    }
}
