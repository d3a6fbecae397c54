// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    Staff,
}

// --- PERFIL (Identidade + Cargo + Empresa) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    // Mesmo ID da conta (users.id)
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "maria")]
    pub username: String,

    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    // None = sem empresa (ou removido da equipe)
    pub company_id: Option<Uuid>,

    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

/// Patch de perfil. `company_id: Some(None)` desvincula da empresa.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub company_id: Option<Option<Uuid>>,
}

// Edição feita pelo próprio usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 3, message = "invalid_username"))]
    #[schema(example = "maria.silva")]
    pub username: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria Silva")]
    pub full_name: Option<String>,
}

impl From<UpdateProfilePayload> for ProfileUpdate {
    fn from(payload: UpdateProfilePayload) -> Self {
        Self {
            username: payload.username,
            full_name: payload.full_name,
            ..Default::default()
        }
    }
}

// --- EQUIPE ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamMemberPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "joao")]
    pub username: String,

    #[schema(example = "staff")]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRolePayload {
    #[schema(example = "manager")]
    pub role: Role,
}
