// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    #[schema(example = "MedSupply Brasil")]
    pub name: String,
    /// Sempre 14 dígitos, sem pontuação.
    #[schema(example = "12345678000190")]
    pub cnpj: String,
    #[schema(example = "(11) 3456-7890")]
    pub phone: String,
    #[schema(example = "contato@medsupply.com.br")]
    pub email: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Normaliza o CNPJ: mantém só os dígitos ("12.345.678/0001-90" -> "12345678000190").
/// Os dígitos verificadores não são conferidos.
pub fn normalize_cnpj(raw: &str) -> Result<String, AppError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(AppError::invalid("cnpj", "required"));
    }
    if digits.len() != 14 {
        return Err(AppError::invalid("cnpj", "invalid_cnpj_length"));
    }
    if digits.chars().all(|c| Some(c) == digits.chars().next()) {
        return Err(AppError::invalid("cnpj", "invalid_cnpj_repeated"));
    }
    Ok(digits)
}

fn require_text(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(field, "required"));
    }
    Ok(())
}

impl Supplier {
    pub fn new(name: &str, cnpj: &str, phone: &str, email: &str) -> Result<Self, AppError> {
        require_text("name", name)?;
        require_text("phone", phone)?;
        require_text("email", email)?;
        let cnpj = normalize_cnpj(cnpj)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            cnpj,
            phone: phone.to_string(),
            email: email.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    // O CNPJ não muda depois do cadastro.
    pub fn update_info(&mut self, name: &str, phone: &str, email: &str) -> Result<(), AppError> {
        require_text("name", name)?;
        require_text("phone", phone)?;
        require_text("email", email)?;
        self.name = name.to_string();
        self.phone = phone.to_string();
        self.email = email.to_string();
        self.updated_at = Some(Utc::now());
        Ok(())
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
    fn cnpj_is_normalized_to_digits() {
        assert_eq!(normalize_cnpj("12.345.678/0001-90").unwrap(), "12345678000190");
        assert_eq!(normalize_cnpj("12345678000190").unwrap(), "12345678000190");
    }

    #[test]
    fn cnpj_rejects_wrong_length_and_repeated_digits() {
        assert!(matches!(
            normalize_cnpj("1234"),
            Err(AppError::InvalidArgument { reason: "invalid_cnpj_length", .. })
        ));
        assert!(matches!(
            normalize_cnpj("11.111.111/1111-11"),
            Err(AppError::InvalidArgument { reason: "invalid_cnpj_repeated", .. })
        ));
        assert!(matches!(
            normalize_cnpj("--"),
            Err(AppError::InvalidArgument { reason: "required", .. })
        ));
    }

    #[test]
    fn update_info_keeps_cnpj() {
        let mut supplier = Supplier::new(
            "MedSupply Brasil",
            "12.345.678/0001-90",
            "(11) 3456-7890",
            "contato@medsupply.com.br",
        )
        .unwrap();

        supplier.update_info("MedSupply", "(11) 0000-0000", "novo@medsupply.com.br").unwrap();

        assert_eq!(supplier.cnpj, "12345678000190");
        assert_eq!(supplier.email, "novo@medsupply.com.br");
        assert!(supplier.update_info("", "1", "a@b.c").is_err());
    }
}
