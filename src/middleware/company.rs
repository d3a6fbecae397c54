// src/middleware/company.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Cabeçalho com que o super_admin escolhe a empresa
pub const COMPANY_ID_HEADER: &str = "x-company-id";

/// Empresa pedida pelo cliente. `None` = cabeçalho ausente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyContext(pub Option<Uuid>);

impl CompanyContext {
    pub fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let Some(value) = parts.headers.get(COMPANY_ID_HEADER) else {
            return Ok(CompanyContext(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(|id| CompanyContext(Some(id)))
            .ok_or(AppError::InvalidCompanyHeader)
    }
}

impl FromRequestParts<AppState> for CompanyContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        CompanyContext::from_parts(parts).map_err(|e| e.to_api_error(&Locale::from_parts(parts), &state.i18n_store))
    }
}
