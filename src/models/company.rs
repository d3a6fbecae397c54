// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Trial,
    Active,
    Suspended,
    Cancelled,
}

// ---
// Empresa (o "Tenant")
// ---
// Os campos de contato alimentam o cabeçalho dos PDFs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Minha Loja Ltda")]
    pub name: String,

    pub subscription_status: SubscriptionStatus,

    #[schema(example = "contato@minhaloja.com")]
    pub email: Option<String>,

    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,

    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub tax_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Minha Loja Ltda")]
    pub name: String,

    #[serde(default)]
    pub subscription_status: SubscriptionStatus,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

impl NewCompany {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscription_status: SubscriptionStatus::default(),
            email: None,
            phone: None,
            address: None,
            tax_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub subscription_status: Option<SubscriptionStatus>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}
