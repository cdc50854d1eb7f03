// src/db/stock_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::stock::{CurrentStock, StockView},
};

const STOCK_VIEW_SELECT: &str = r#"
    SELECT cs.id, cs.product_id, cs.quantity, cs.last_updated_at,
           p.name AS product_name,
           p.code AS product_code
    FROM current_stocks cs
    JOIN products p ON p.id = cs.product_id
"#;

/// `FOR UPDATE`: duas baixas concorrentes no mesmo produto são serializadas aqui.
pub async fn find_by_product_for_update<'e, E>(executor: E, product_id: Uuid) -> Result<Option<CurrentStock>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let stock = sqlx::query_as::<_, CurrentStock>(
        "SELECT * FROM current_stocks WHERE product_id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(executor)
    .await?;
    Ok(stock)
}

pub async fn find_view_by_product<'e, E>(executor: E, product_id: Uuid) -> Result<Option<StockView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{STOCK_VIEW_SELECT} WHERE cs.product_id = $1");
    let view = sqlx::query_as::<_, StockView>(&sql)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
    Ok(view)
}

pub async fn list_views<'e, E>(executor: E) -> Result<Vec<StockView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{STOCK_VIEW_SELECT} ORDER BY p.name ASC");
    let views = sqlx::query_as::<_, StockView>(&sql).fetch_all(executor).await?;
    Ok(views)
}

pub async fn list_low<'e, E>(executor: E, threshold: i32) -> Result<Vec<StockView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{STOCK_VIEW_SELECT} WHERE cs.quantity <= $1 ORDER BY cs.quantity ASC, p.name ASC");
    let views = sqlx::query_as::<_, StockView>(&sql)
        .bind(threshold)
        .fetch_all(executor)
        .await?;
    Ok(views)
}

pub async fn insert<'e, E>(executor: E, stock: &CurrentStock) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO current_stocks (id, product_id, quantity, last_updated_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(stock.id)
    .bind(stock.product_id)
    .bind(stock.quantity)
    .bind(stock.last_updated_at)
    .bind(stock.created_at)
    .bind(stock.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &stock.product_id.to_string()))?;
    Ok(())
}

pub async fn update<'e, E>(executor: E, stock: &CurrentStock) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "UPDATE current_stocks SET quantity = $2, last_updated_at = $3, updated_at = $4 WHERE id = $1",
    )
    .bind(stock.id)
    .bind(stock.quantity)
    .bind(stock.last_updated_at)
    .bind(stock.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
