// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LOCALE: &str = "pt";

const PT: &[(&str, &str)] = &[
    ("entity.supplier", "Fornecedor"),
    ("entity.brand", "Marca"),
    ("entity.product", "Produto"),
    ("entity.stock", "Estoque"),
    ("entity.stock_output", "Saída de Estoque"),
    ("entity.supplier_configuration", "Configuração"),
    ("field.name", "nome"),
    ("field.code", "código"),
    ("field.cnpj", "CNPJ"),
    ("field.email", "email"),
    ("field.productId", "produto"),
    ("field.supplierId", "fornecedor"),
    ("error.validation", "Um ou mais campos são inválidos."),
    ("error.not_found", "{entity} com ID {id} não encontrado"),
    ("error.already_exists", "{entity} com {field} '{value}' já existe"),
    ("error.invalid_argument", "Valor inválido para '{field}': {reason}"),
    ("error.insufficient_stock", "Estoque insuficiente. Disponível: {available}, Solicitado: {requested}"),
    ("error.missing_stock", "O produto {id} não possui estoque associado"),
    ("error.domain_invalid", "Operação não permitida: {reason}"),
    ("error.in_use", "{entity} possui {dependents} vinculados e não pode ser excluído"),
    ("error.internal", "Ocorreu um erro inesperado."),
    ("reason.required", "campo obrigatório"),
    ("reason.must_be_positive", "deve ser maior que zero"),
    ("reason.must_not_be_negative", "não pode ser negativo"),
    ("reason.overflow", "excede o valor máximo permitido"),
    ("reason.minimum_exceeds_planning", "meses mínimos não pode ser maior que meses de planejamento"),
    ("reason.invalid_cnpj_length", "o CNPJ deve ter 14 dígitos"),
    ("reason.invalid_cnpj_repeated", "o CNPJ não pode ter todos os dígitos iguais"),
    ("reason.invalid_date_range", "a data inicial deve ser anterior à data final"),
    ("reason.product_inactive", "produto inativo"),
    ("reason.stock_product_mismatch", "o estoque não pertence a este produto"),
    ("reason.output_product_mismatch", "a saída não pertence a este estoque"),
];

const EN: &[(&str, &str)] = &[
    ("entity.supplier", "Supplier"),
    ("entity.brand", "Brand"),
    ("entity.product", "Product"),
    ("entity.stock", "Stock"),
    ("entity.stock_output", "Stock output"),
    ("entity.supplier_configuration", "Supplier configuration"),
    ("field.name", "name"),
    ("field.code", "code"),
    ("field.cnpj", "CNPJ"),
    ("field.email", "email"),
    ("field.productId", "product"),
    ("field.supplierId", "supplier"),
    ("error.validation", "One or more fields are invalid."),
    ("error.not_found", "{entity} with ID {id} not found"),
    ("error.already_exists", "{entity} with {field} '{value}' already exists"),
    ("error.invalid_argument", "Invalid value for '{field}': {reason}"),
    ("error.insufficient_stock", "Insufficient stock. Available: {available}, Requested: {requested}"),
    ("error.missing_stock", "Product {id} has no stock attached"),
    ("error.domain_invalid", "Operation not allowed: {reason}"),
    ("error.in_use", "{entity} still has linked {dependents} and cannot be deleted"),
    ("error.internal", "An unexpected error occurred."),
    ("reason.required", "field is required"),
    ("reason.must_be_positive", "must be greater than zero"),
    ("reason.must_not_be_negative", "must not be negative"),
    ("reason.overflow", "exceeds the maximum allowed value"),
    ("reason.minimum_exceeds_planning", "minimum months cannot exceed planning months"),
    ("reason.invalid_cnpj_length", "CNPJ must have 14 digits"),
    ("reason.invalid_cnpj_repeated", "CNPJ cannot have all digits equal"),
    ("reason.invalid_date_range", "start date must not be after end date"),
    ("reason.product_inactive", "product is inactive"),
    ("reason.stock_product_mismatch", "stock does not belong to this product"),
    ("reason.output_product_mismatch", "output does not belong to this stock"),
];

/// Catálogo de mensagens por idioma. Clonar é barato (Arc).
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self {
            catalogs: Arc::new(catalogs),
        }
    }

    // Idioma desconhecido cai no padrão; chave desconhecida volta como está.
    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.catalogs
            .get(locale)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .map(|message| message.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Traduz e substitui os marcadores `{nome}`.
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, String)]) -> String {
        let mut message = self.translate(locale, key);
        for (name, value) in args {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("fr", "entity.brand"), "Marca");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "reason.nope"), "reason.nope");
    }

    #[test]
    fn format_replaces_every_placeholder() {
        let store = I18nStore::new();
        let message = store.format(
            "en",
            "error.already_exists",
            &[
                ("entity", "Brand".to_string()),
                ("field", "name".to_string()),
                ("value", "MedTech".to_string()),
            ],
        );
        assert_eq!(message, "Brand with name 'MedTech' already exists");
    }

    #[test]
    fn both_catalogs_have_the_same_keys() {
        let pt: Vec<_> = PT.iter().map(|(k, _)| *k).collect();
        let en: Vec<_> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(pt, en);
    }
}
