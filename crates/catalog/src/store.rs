use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stockroom_core::{Database, StoreError};

use crate::model::Product;

/// Persistence seam for product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Active products, newest first.
    async fn list_active(&self) -> Result<Vec<Product>, StoreError>;

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Insert every product or none of them.
    async fn insert_products(&self, products: &[Product]) -> Result<(), StoreError>;

    /// Remove a product by id. Returns whether a record was removed.
    async fn delete_product(&self, id: &str) -> Result<bool, StoreError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    description: String,
    image_url: String,
    category: String,
    stock: i64,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let timestamp = |value: i64| {
            DateTime::<Utc>::from_timestamp_micros(value).ok_or_else(|| {
                StoreError::Corrupt(format!("product {} has bad timestamp {}", row.id, value))
            })
        };
        let created_at = timestamp(row.created_at)?;
        let updated_at = timestamp(row.updated_at)?;

        Ok(Product {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            image_url: row.image_url,
            category: row.category,
            stock: row.stock,
            is_active: row.is_active,
            created_at,
            updated_at,
        })
    }
}

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products
        (id, name, price, description, image_url, category, stock, is_active, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

fn bind_product<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    product: &'q Product,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(&product.category)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at.timestamp_micros())
        .bind(product.updated_at.timestamp_micros())
}

#[async_trait]
impl ProductStore for Database {
    async fn list_active(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, description, image_url, category, stock, is_active,
                   created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        bind_product(sqlx::query(INSERT_PRODUCT), product)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn insert_products(&self, products: &[Product]) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;
        for product in products {
            bind_product(sqlx::query(INSERT_PRODUCT), product)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
