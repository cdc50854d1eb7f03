// src/models/brand.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    #[schema(example = "MedTech")]
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Brand {
    pub fn new(name: &str) -> Result<Self, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::invalid("name", "required"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::invalid("name", "required"));
        }
        self.name = name.to_string();
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Comparação de nome usada na checagem de duplicidade (sem diferenciar maiúsculas).
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Some(Utc::now());
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_comparison_ignores_case() {
        let brand = Brand::new("MedTech").unwrap();
        assert!(brand.has_name("medtech"));
        assert!(brand.has_name("MEDTECH"));
        assert!(!brand.has_name("MedTech2"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(Brand::new("  ").is_err());
        let mut brand = Brand::new("MedTech").unwrap();
        assert!(brand.update_name("").is_err());
        assert_eq!(brand.name, "MedTech");
        assert!(brand.updated_at.is_none());
    }
}
