// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{company::Company, profile::{Profile, Role}};

// Representa a conta (credenciais) vinda do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,

    #[schema(example = "maria@email.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

// Dados para cadastro
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    #[schema(example = "segredo123")]
    pub password: String,

    #[validate(length(min = 3, message = "invalid_username"))]
    #[schema(example = "maria")]
    pub username: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    // Se vier, cria a empresa e o usuário vira admin dela
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Minha Loja Ltda")]
    pub company_name: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "segredo123")]
    pub password: String,
}

/// O que o repositório precisa para registrar uma conta de uma vez.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub user: UserAccount,
    pub profile: Profile,
    pub company: Option<Company>,
}

// Sessão atual (getSession)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub user: UserAccount,
    pub profile: Profile,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session: Option<SessionView>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub session: SessionView,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub sid: Uuid,  // ID da sessão (revogada no sign-out)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
