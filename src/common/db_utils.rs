use crate::common::error::{AppError, Entity};

// ---
// Helper: Violação de constraint -> erro de domínio
// ---
/// A checagem de unicidade é feita no service, mas duas requisições concorrentes
/// podem passar por ela ao mesmo tempo. Aí quem responde é o índice único do banco,
/// e convertemos o nome da constraint no mesmo `AlreadyExists` do service.
pub(crate) fn map_unique_violation(e: sqlx::Error, value: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if let Some((entity, field)) = constraint_target(constraint) {
                return AppError::already_exists(entity, field, value);
            }
        }
    }
    e.into()
}

/// Delete barrado por foreign key (ON DELETE RESTRICT) vira `InUse`.
pub(crate) fn map_restrict_violation(e: sqlx::Error, entity: Entity) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::InUse {
                entity,
                dependents: Entity::Product,
            };
        }
    }
    e.into()
}

fn constraint_target(constraint: &str) -> Option<(Entity, &'static str)> {
    match constraint {
        "suppliers_cnpj_key" => Some((Entity::Supplier, "cnpj")),
        "suppliers_email_key" => Some((Entity::Supplier, "email")),
        "ux_brands_name_lower" => Some((Entity::Brand, "name")),
        "products_code_key" => Some((Entity::Product, "code")),
        "current_stocks_product_id_key" => Some((Entity::Stock, "productId")),
        "supplier_configurations_supplier_id_key" => Some((Entity::SupplierConfiguration, "supplierId")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_constraints_map_to_entities() {
        assert_eq!(constraint_target("products_code_key"), Some((Entity::Product, "code")));
        assert_eq!(constraint_target("suppliers_email_key"), Some((Entity::Supplier, "email")));
        assert_eq!(constraint_target("whatever"), None);
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = map_unique_violation(sqlx::Error::RowNotFound, "X");
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
        let err = map_restrict_violation(sqlx::Error::RowNotFound, Entity::Brand);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
