//! # Product Repository
//!
//! Catalog reads and writes: products, and the category lookup that
//! backs them.

use sqlx::SqlitePool;
use tracing::debug;

use lylas_core::{Category, Product, ProductDetail};

use crate::error::{DbError, DbResult};

/// Data for creating or updating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category_id: i64,
    pub price_cents: i64,
}

/// Repository for catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products with their category names.
    pub async fn list(&self) -> DbResult<Vec<ProductDetail>> {
        let products = sqlx::query_as::<_, ProductDetail>(
            "SELECT p.id, p.name, p.price_cents, p.category_id,
                    c.name AS category_name
             FROM products p
             JOIN categories c ON c.id = p.category_id
             ORDER BY p.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fetches a single product.
    pub async fn get(&self, id: i64) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, category_id, price_cents FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        Ok(product)
    }

    /// Creates a product. Returns the stored row.
    pub async fn create(&self, new: NewProduct) -> DbResult<Product> {
        let result = sqlx::query(
            "INSERT INTO products (name, category_id, price_cents) VALUES (?, ?, ?)",
        )
        .bind(&new.name)
        .bind(new.category_id)
        .bind(new.price_cents)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %new.name, "Product created");

        self.get(id).await
    }

    /// Updates a product in place.
    pub async fn update(&self, id: i64, new: NewProduct) -> DbResult<Product> {
        let result = sqlx::query(
            "UPDATE products SET name = ?, category_id = ?, price_cents = ? WHERE id = ?",
        )
        .bind(&new.name)
        .bind(new.category_id)
        .bind(new.price_cents)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Deletes a product. Fails with a foreign key violation if stock
    /// batches still reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists all categories.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
