// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LOCALE;

// Extrator de idioma (Accept-Language). Só guardamos o idioma base: "pt-BR" -> "pt".
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    .map(|tag| base_language(tag.as_str()))
            })
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Ok(Locale(lang))
    }
}

fn base_language(tag: &str) -> String {
    tag.split('-').next().unwrap_or(tag).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> String {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let locale = Locale::from_request_parts(&mut parts, &()).await.unwrap();
        locale.0
    }

    #[tokio::test]
    async fn defaults_to_portuguese() {
        assert_eq!(extract(None).await, "pt");
    }

    #[tokio::test]
    async fn picks_the_preferred_base_language() {
        assert_eq!(extract(Some("en-US,en;q=0.9,pt-BR;q=0.8")).await, "en");
        assert_eq!(extract(Some("pt-BR")).await, "pt");
    }
}
