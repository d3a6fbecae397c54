// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erro interno da aplicação (serviços e repositórios).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // O argumento é o tipo da entidade ("client", "invoice", ...)
    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Regras de linha que o repositório garante (quantidade >= 1, preço >= 0)
    #[error("Linha de fatura inválida: {0}")]
    InvalidLineItem(String),

    #[error("É preciso informar a empresa (x-company-id)")]
    CompanyRequired,

    #[error("Operação não permitida")]
    Forbidden,

    #[error("Cabeçalho x-company-id inválido")]
    InvalidCompanyHeader,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar documento: {0}")]
    DocumentError(String),
}

// Erro que sai na resposta HTTP, já traduzido.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "error.validation"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "error.email_already_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "error.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "error.invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "error.user_not_found"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "error.not_found"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "error.unique_violation"),
            AppError::InvalidLineItem(_) => (StatusCode::UNPROCESSABLE_ENTITY, "error.invalid_line_item"),
            AppError::CompanyRequired => (StatusCode::BAD_REQUEST, "error.company_required"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "error.forbidden"),
            AppError::InvalidCompanyHeader => (StatusCode::BAD_REQUEST, "error.invalid_company_header"),
            AppError::FontNotFound(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error.font_not_found"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_)
            | AppError::DocumentError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "error.internal"),
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();
        let lang = locale.0.as_str();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let mut error = store.translate(lang, key);
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut fields = BTreeMap::new();
                collect_field_errors(&errors, String::new(), lang, store, &mut fields);
                Some(json!(fields))
            }
            AppError::NotFound(kind) => {
                let entity = store.translate(lang, &format!("entity.{}", kind));
                error = error.replace("{entity}", &entity);
                None
            }
            AppError::UniqueConstraintViolation(detail) | AppError::InvalidLineItem(detail) => {
                Some(json!({ "reason": detail }))
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

// Achata erros aninhados: "items[0].quantity" -> ["Deve ser no mínimo 1."]
fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: String,
    lang: &str,
    store: &I18nStore,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        let code = e.message.as_deref().unwrap_or(&e.code);
                        store.translate(lang, &format!("validation.{}", code))
                    })
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_field_errors(inner, path, lang, store, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, format!("{}[{}]", path, index), lang, store, out);
                }
            }
        }
    }
}
