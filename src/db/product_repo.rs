// src/db/product_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::product::{Product, ProductFilter, ProductView},
};

const PRODUCT_VIEW_SELECT: &str = r#"
    SELECT p.id, p.code, p.name, p.active, p.created_at, p.updated_at, p.supplier_id, p.brand_id,
           s.name AS supplier_name,
           b.name AS brand_name,
           cs.quantity AS stock_quantity
    FROM products p
    JOIN suppliers s ON s.id = p.supplier_id
    JOIN brands b ON b.id = p.brand_id
    LEFT JOIN current_stocks cs ON cs.product_id = p.id
"#;

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Product>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(product)
}

pub async fn find_view_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<ProductView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.id = $1");
    let view = sqlx::query_as::<_, ProductView>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(view)
}

// Busca literal: '%', '_' e '\' do usuário não são curingas.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn list_views<'e, E>(executor: E, filter: &ProductFilter) -> Result<Vec<ProductView>, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    // Filtros opcionais: parâmetro NULL desliga a condição.
    let sql = format!(
        r#"{PRODUCT_VIEW_SELECT}
        WHERE ($1::boolean IS NULL OR p.active = $1)
          AND ($2::uuid IS NULL OR p.supplier_id = $2)
          AND ($3::uuid IS NULL OR p.brand_id = $3)
          AND ($4::text IS NULL
               OR p.code ILIKE '%' || $4 || '%' ESCAPE '\'
               OR p.name ILIKE '%' || $4 || '%' ESCAPE '\')
        ORDER BY p.name ASC"#
    );
    let views = sqlx::query_as::<_, ProductView>(&sql)
        .bind(filter.active)
        .bind(filter.supplier_id)
        .bind(filter.brand_id)
        .bind(filter.search.as_deref().map(escape_like))
        .fetch_all(executor)
        .await?;
    Ok(views)
}

pub async fn code_exists<'e, E>(executor: E, code: &str, excluding: Option<Uuid>) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM products WHERE code = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(code)
    .bind(excluding)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

pub async fn exists_by_supplier<'e, E>(executor: E, supplier_id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE supplier_id = $1)")
        .bind(supplier_id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

pub async fn exists_by_brand<'e, E>(executor: E, brand_id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE brand_id = $1)")
        .bind(brand_id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

pub async fn count<'e, E>(executor: E) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(executor)
        .await?;
    Ok(total)
}

pub async fn insert<'e, E>(executor: E, product: &Product) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO products (id, code, name, active, created_at, updated_at, supplier_id, brand_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(product.id)
    .bind(&product.code)
    .bind(&product.name)
    .bind(product.active)
    .bind(product.created_at)
    .bind(product.updated_at)
    .bind(product.supplier_id)
    .bind(product.brand_id)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &product.code))?;
    Ok(())
}

pub async fn update<'e, E>(executor: E, product: &Product) -> Result<(), AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        UPDATE products
        SET code = $2, name = $3, active = $4, updated_at = $5, supplier_id = $6, brand_id = $7
        WHERE id = $1
        "#,
    )
    .bind(product.id)
    .bind(&product.code)
    .bind(&product.name)
    .bind(product.active)
    .bind(product.updated_at)
    .bind(product.supplier_id)
    .bind(product.brand_id)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, &product.code))?;
    Ok(())
}

// Saldo e saídas caem por ON DELETE CASCADE.
pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_wildcards_are_escaped() {
        assert_eq!(escape_like("PROD_001"), "PROD\\_001");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("Seringa"), "Seringa");
    }
}
