// src/db/supplier_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_restrict_violation, map_unique_violation},
        error::{AppError, Entity},
    },
    models::supplier::Supplier,
};

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Supplier>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(supplier)
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Supplier>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name ASC")
        .fetch_all(executor)
        .await?;
    Ok(suppliers)
}

pub async fn cnpj_exists<'e, E>(executor: E, cnpj: &str, excluding: Option<Uuid>) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM suppliers WHERE cnpj = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(cnpj)
    .bind(excluding)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

pub async fn email_exists<'e, E>(executor: E, email: &str, excluding: Option<Uuid>) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM suppliers WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(excluding)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

pub async fn insert<'e, E>(executor: E, supplier: &Supplier) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO suppliers (id, name, cnpj, phone, email, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(supplier.id)
    .bind(&supplier.name)
    .bind(&supplier.cnpj)
    .bind(&supplier.phone)
    .bind(&supplier.email)
    .bind(supplier.active)
    .bind(supplier.created_at)
    .bind(supplier.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &supplier.cnpj))?;
    Ok(())
}

pub async fn update<'e, E>(executor: E, supplier: &Supplier) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE suppliers
        SET name = $2, phone = $3, email = $4, active = $5, updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(supplier.id)
    .bind(&supplier.name)
    .bind(&supplier.phone)
    .bind(&supplier.email)
    .bind(supplier.active)
    .bind(supplier.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &supplier.email))?;
    Ok(())
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| map_restrict_violation(e, Entity::Supplier))?;
    Ok(result.rows_affected() > 0)
}
