// src/db/stock_output_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock_output::{OutputFilter, StockOutput, StockOutputView},
};

const OUTPUT_VIEW_SELECT: &str = r#"
    SELECT so.id, so.product_id, so.quantity, so.output_date, so.notes,
           p.name AS product_name,
           p.code AS product_code
    FROM stock_outputs so
    JOIN products p ON p.id = so.product_id
"#;

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<StockOutput>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let output = sqlx::query_as::<_, StockOutput>("SELECT * FROM stock_outputs WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(output)
}

pub async fn find_view_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<StockOutputView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{OUTPUT_VIEW_SELECT} WHERE so.id = $1");
    let view = sqlx::query_as::<_, StockOutputView>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(view)
}

// Intervalo de datas inclusivo nas duas pontas.
pub async fn list_views<'e, E>(executor: E, filter: &OutputFilter) -> Result<Vec<StockOutputView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!(
        r#"{OUTPUT_VIEW_SELECT}
        WHERE ($1::uuid IS NULL OR so.product_id = $1)
          AND ($2::timestamptz IS NULL OR so.output_date >= $2)
          AND ($3::timestamptz IS NULL OR so.output_date <= $3)
        ORDER BY so.output_date DESC"#
    );
    let views = sqlx::query_as::<_, StockOutputView>(&sql)
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(executor)
        .await?;
    Ok(views)
}

pub async fn insert<'e, E>(executor: E, output: &StockOutput) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO stock_outputs (id, product_id, quantity, output_date, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(output.id)
    .bind(output.product_id)
    .bind(output.quantity)
    .bind(output.output_date)
    .bind(output.notes.as_deref())
    .bind(output.created_at)
    .bind(output.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn update<'e, E>(executor: E, output: &StockOutput) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("UPDATE stock_outputs SET quantity = $2, notes = $3, updated_at = $4 WHERE id = $1")
        .bind(output.id)
        .bind(output.quantity)
        .bind(output.notes.as_deref())
        .bind(output.updated_at)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM stock_outputs WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
