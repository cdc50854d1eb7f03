// src/models/supplier_configuration.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Parâmetros de reposição por fornecedor (um por fornecedor) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierConfiguration {
    pub id: Uuid,
    pub supplier_id: Uuid,
    /// Horizonte de planejamento, em meses.
    #[schema(example = 6)]
    pub planning_months: i32,
    /// Estoque mínimo expresso em meses de consumo.
    #[schema(example = 2)]
    pub minimum_months: i32,
    #[schema(example = 15)]
    pub delivery_lead_time_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_parameters(planning_months: i32, minimum_months: i32, delivery_lead_time_days: i32) -> Result<(), AppError> {
    if planning_months <= 0 {
        return Err(AppError::invalid("planningMonths", "must_be_positive"));
    }
    if minimum_months <= 0 {
        return Err(AppError::invalid("minimumMonths", "must_be_positive"));
    }
    if delivery_lead_time_days <= 0 {
        return Err(AppError::invalid("deliveryLeadTimeDays", "must_be_positive"));
    }
    if minimum_months > planning_months {
        return Err(AppError::invalid("minimumMonths", "minimum_exceeds_planning"));
    }
    Ok(())
}

impl SupplierConfiguration {
    pub fn new(
        supplier_id: Uuid,
        planning_months: i32,
        minimum_months: i32,
        delivery_lead_time_days: i32,
    ) -> Result<Self, AppError> {
        if supplier_id.is_nil() {
            return Err(AppError::invalid("supplierId", "required"));
        }
        validate_parameters(planning_months, minimum_months, delivery_lead_time_days)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            supplier_id,
            planning_months,
            minimum_months,
            delivery_lead_time_days,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_configuration(
        &mut self,
        planning_months: i32,
        minimum_months: i32,
        delivery_lead_time_days: i32,
    ) -> Result<(), AppError> {
        validate_parameters(planning_months, minimum_months, delivery_lead_time_days)?;
        self.planning_months = planning_months;
        self.minimum_months = minimum_months;
        self.delivery_lead_time_days = delivery_lead_time_days;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn calculate_delivery_date(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
        Duration::try_days(i64::from(self.delivery_lead_time_days))
            .and_then(|lead_time| from.checked_add_signed(lead_time))
            .ok_or_else(|| AppError::invalid("deliveryLeadTimeDays", "overflow"))
    }

    /// Quantidade a pedir para cobrir o horizonte de planejamento.
    pub fn calculate_reorder_quantity(&self, average_monthly_consumption: i32) -> Result<i32, AppError> {
        if average_monthly_consumption < 0 {
            return Err(AppError::invalid("averageMonthlyConsumption", "must_not_be_negative"));
        }
        average_monthly_consumption
            .checked_mul(self.planning_months)
            .ok_or_else(|| AppError::invalid("averageMonthlyConsumption", "overflow"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierConfigurationView {
    pub id: Uuid,
    pub supplier_id: Uuid,
    #[schema(example = "MedSupply Brasil")]
    pub supplier_name: Option<String>,
    pub planning_months: i32,
    pub minimum_months: i32,
    pub delivery_lead_time_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierConfigurationView {
    pub fn new(config: &SupplierConfiguration, supplier_name: Option<String>) -> Self {
        Self {
            id: config.id,
            supplier_id: config.supplier_id,
            supplier_name,
            planning_months: config.planning_months,
            minimum_months: config.minimum_months,
            delivery_lead_time_days: config.delivery_lead_time_days,
            active: config.active,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPlan {
    pub configuration_id: Uuid,
    pub supplier_id: Uuid,
    #[schema(example = 60)]
    pub reorder_quantity: i32,
    pub expected_delivery_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_configuration_is_created() {
        let config = SupplierConfiguration::new(Uuid::new_v4(), 6, 2, 15).unwrap();
        assert!(config.active);
        assert_eq!(config.planning_months, 6);
    }

    #[test]
    fn minimum_above_planning_is_rejected() {
        let err = SupplierConfiguration::new(Uuid::new_v4(), 2, 6, 15).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidArgument { field: "minimumMonths", reason: "minimum_exceeds_planning" }
        ));
    }

    #[test]
    fn non_positive_fields_are_rejected() {
        let supplier = Uuid::new_v4();
        assert!(SupplierConfiguration::new(supplier, 0, 1, 1).is_err());
        assert!(SupplierConfiguration::new(supplier, 1, 0, 1).is_err());
        assert!(SupplierConfiguration::new(supplier, 1, 1, 0).is_err());
        assert!(SupplierConfiguration::new(Uuid::nil(), 1, 1, 1).is_err());
    }

    #[test]
    fn update_keeps_values_on_error() {
        let mut config = SupplierConfiguration::new(Uuid::new_v4(), 6, 2, 15).unwrap();
        assert!(config.update_configuration(3, 4, 10).is_err());
        assert_eq!((config.planning_months, config.minimum_months), (6, 2));

        config.update_configuration(12, 3, 30).unwrap();
        assert_eq!(config.delivery_lead_time_days, 30);
    }

    #[test]
    fn reorder_math() {
        let config = SupplierConfiguration::new(Uuid::new_v4(), 6, 2, 15).unwrap();
        assert_eq!(config.calculate_reorder_quantity(10).unwrap(), 60);
        assert!(config.calculate_reorder_quantity(i32::MAX).is_err());

        let from = Utc::now();
        assert_eq!(config.calculate_delivery_date(from).unwrap() - from, Duration::days(15));
    }

    #[test]
    fn delivery_date_out_of_range_is_an_error() {
        let config = SupplierConfiguration::new(Uuid::new_v4(), 6, 2, i32::MAX).unwrap();
        assert!(matches!(
            config.calculate_delivery_date(Utc::now()),
            Err(AppError::InvalidArgument { field: "deliveryLeadTimeDays", reason: "overflow" })
        ));
    }
}
