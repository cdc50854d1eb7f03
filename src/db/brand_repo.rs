// src/db/brand_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_restrict_violation, map_unique_violation},
        error::{AppError, Entity},
    },
    models::brand::Brand,
};

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Brand>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let brand = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(brand)
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Brand>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let brands = sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name ASC")
        .fetch_all(executor)
        .await?;
    Ok(brands)
}

// Mesma regra do índice ux_brands_name_lower.
pub async fn name_exists<'e, E>(executor: E, name: &str, excluding: Option<Uuid>) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM brands WHERE lower(name) = lower($1) AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(excluding)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

pub async fn insert<'e, E>(executor: E, brand: &Brand) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO brands (id, name, active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(brand.id)
    .bind(&brand.name)
    .bind(brand.active)
    .bind(brand.created_at)
    .bind(brand.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &brand.name))?;
    Ok(())
}

pub async fn update<'e, E>(executor: E, brand: &Brand) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("UPDATE brands SET name = $2, active = $3, updated_at = $4 WHERE id = $1")
        .bind(brand.id)
        .bind(&brand.name)
        .bind(brand.active)
        .bind(brand.updated_at)
        .execute(executor)
        .await
        .map_err(|e| map_unique_violation(e, &brand.name))?;
    Ok(())
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM brands WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .map_err(|e| map_restrict_violation(e, Entity::Brand))?;
    Ok(result.rows_affected() > 0)
}
