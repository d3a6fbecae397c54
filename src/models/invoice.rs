// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    error::AppError,
    validation::{price_in_range, quantity_in_range},
};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
}

// Fornecedor tem o estado extra "cancelled"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "supplier_invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SupplierInvoiceStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

// --- Linhas ---

/// Linha persistida. `amount` é sempre `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Option<Uuid>,

    #[schema(example = "Café 500g")]
    pub description: String,

    #[schema(example = "2")]
    pub quantity: Decimal,
    #[schema(example = "25.00")]
    pub unit_price: Decimal,
    #[schema(example = "50.00")]
    pub amount: Decimal,
}

impl InvoiceItem {
    pub fn from_line(invoice_id: Uuid, line: &LineItem) -> Result<Self, AppError> {
        let amount = line
            .quantity
            .checked_mul(line.unit_price)
            .ok_or_else(|| AppError::InvalidLineItem(format!("{} x {} overflows", line.quantity, line.unit_price)))?;

        Ok(Self {
            id: Uuid::new_v4(),
            invoice_id,
            product_id: line.product_id,
            description: line.description.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            amount,
        })
    }
}

/// Linha em edição (formulário). As regras de validação só rodam no envio da fatura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Café 500g")]
    pub description: String,

    #[validate(custom(function = "quantity_in_range"))]
    #[schema(example = "2")]
    pub quantity: Decimal,

    #[validate(custom(function = "price_in_range"))]
    #[schema(example = "25.00")]
    pub unit_price: Decimal,

    // Calculado no servidor; o valor enviado é ignorado
    #[serde(default)]
    #[schema(example = "50.00")]
    pub amount: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            product_id: None,
            description: String::new(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }
}

impl From<&InvoiceItem> for LineItem {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            product_id: item.product_id,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            amount: item.amount,
        }
    }
}

// --- Faturas de cliente ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub company_id: Uuid,

    #[schema(example = "INV-1767225600000")]
    pub number: String,

    pub client_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-01-31")]
    pub due_date: NaiveDate,

    #[schema(example = "150.00")]
    pub total_amount: Decimal,

    pub status: InvoiceStatus,
    pub notes: Option<String>,

    // Carregadas da tabela invoice_items
    #[sqlx(skip)]
    pub items: Vec<InvoiceItem>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Faturas de fornecedor ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInvoice {
    pub id: Uuid,
    pub company_id: Uuid,

    #[schema(example = "SINV-1767225600000")]
    pub number: String,

    pub supplier_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-01-31")]
    pub due_date: NaiveDate,

    #[schema(example = "980.00")]
    pub total_amount: Decimal,

    pub status: SupplierInvoiceStatus,
    pub notes: Option<String>,

    #[sqlx(skip)]
    pub items: Vec<InvoiceItem>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Cabeçalhos (o que o repositório grava) ---

#[derive(Debug, Clone)]
pub struct InvoiceHeader<S> {
    pub number: String,
    // client_id ou supplier_id
    pub party_id: Uuid,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: S,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InvoiceHeaderPatch<S> {
    pub party_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<S>,
    pub notes: Option<String>,
}

impl<S> Default for InvoiceHeaderPatch<S> {
    fn default() -> Self {
        Self { party_id: None, date: None, due_date: None, status: None, notes: None }
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub client_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-01-31")]
    pub due_date: NaiveDate,

    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "at_least_one_item"), nested)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoicePayload {
    pub client_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "at_least_one_item"), nested)]
    pub items: Option<Vec<LineItem>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierInvoicePayload {
    pub supplier_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-01-31")]
    pub due_date: NaiveDate,

    pub status: Option<SupplierInvoiceStatus>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "at_least_one_item"), nested)]
    pub items: Vec<LineItem>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierInvoicePayload {
    pub supplier_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub status: Option<SupplierInvoiceStatus>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "at_least_one_item"), nested)]
    pub items: Option<Vec<LineItem>>,
}

// --- Totais de exportação ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}
