// src/db/supplier_configuration_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::supplier_configuration::{SupplierConfiguration, SupplierConfigurationView},
};

const CONFIGURATION_VIEW_SELECT: &str = r#"
    SELECT sc.id, sc.supplier_id, s.name AS supplier_name,
           sc.planning_months, sc.minimum_months, sc.delivery_lead_time_days,
           sc.active, sc.created_at, sc.updated_at
    FROM supplier_configurations sc
    LEFT JOIN suppliers s ON s.id = sc.supplier_id
"#;

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<SupplierConfiguration>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let config = sqlx::query_as::<_, SupplierConfiguration>("SELECT * FROM supplier_configurations WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(config)
}

pub async fn find_by_supplier<'e, E>(executor: E, supplier_id: Uuid) -> Result<Option<SupplierConfiguration>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let config = sqlx::query_as::<_, SupplierConfiguration>(
        "SELECT * FROM supplier_configurations WHERE supplier_id = $1",
    )
    .bind(supplier_id)
    .fetch_optional(executor)
    .await?;
    Ok(config)
}

pub async fn exists_for_supplier<'e, E>(executor: E, supplier_id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM supplier_configurations WHERE supplier_id = $1)",
    )
    .bind(supplier_id)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

pub async fn find_view_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<SupplierConfigurationView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{CONFIGURATION_VIEW_SELECT} WHERE sc.id = $1");
    let view = sqlx::query_as::<_, SupplierConfigurationView>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(view)
}

pub async fn list_views<'e, E>(executor: E) -> Result<Vec<SupplierConfigurationView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{CONFIGURATION_VIEW_SELECT} ORDER BY s.name ASC");
    let views = sqlx::query_as::<_, SupplierConfigurationView>(&sql)
        .fetch_all(executor)
        .await?;
    Ok(views)
}

pub async fn insert<'e, E>(executor: E, config: &SupplierConfiguration) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO supplier_configurations
            (id, supplier_id, planning_months, minimum_months, delivery_lead_time_days, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(config.id)
    .bind(config.supplier_id)
    .bind(config.planning_months)
    .bind(config.minimum_months)
    .bind(config.delivery_lead_time_days)
    .bind(config.active)
    .bind(config.created_at)
    .bind(config.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &config.supplier_id.to_string()))?;
    Ok(())
}

pub async fn update<'e, E>(executor: E, config: &SupplierConfiguration) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE supplier_configurations
        SET planning_months = $2, minimum_months = $3, delivery_lead_time_days = $4, active = $5, updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(config.id)
    .bind(config.planning_months)
    .bind(config.minimum_months)
    .bind(config.delivery_lead_time_days)
    .bind(config.active)
    .bind(config.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM supplier_configurations WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
