// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::price_in_range;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}

// --- Produtos (catálogo + saldo informativo) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,

    #[schema(example = "Café 500g")]
    pub name: String,

    #[schema(example = "Mercearia")]
    pub category: String,

    #[schema(example = "25.00")]
    pub price: Decimal,

    // Quantidade física, sem reservas
    #[schema(example = 40)]
    pub stock: i32,

    pub status: ProductStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Café 500g")]
    pub name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mercearia")]
    pub category: String,

    #[validate(custom(function = "price_in_range"))]
    #[schema(example = "25.00")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "negative_value"))]
    #[serde(default)]
    #[schema(example = 40)]
    pub stock: i32,

    #[serde(default)]
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "required"))]
    pub category: Option<String>,
    #[validate(custom(function = "price_in_range"))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "negative_value"))]
    pub stock: Option<i32>,
    pub status: Option<ProductStatus>,
}

// --- Visões de estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockLevel {
    pub fn classify(stock: i32, low_stock_threshold: i32) -> Self {
        if stock <= 0 {
            StockLevel::OutOfStock
        } else if stock <= low_stock_threshold {
            StockLevel::LowStock
        } else {
            StockLevel::InStock
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub product_id: Uuid,
    pub name: String,
    pub category: String,
    pub stock: i32,
    pub price: Decimal,
    // Valor do saldo a preço de venda
    pub stock_value: Decimal,
    pub level: StockLevel,
    pub status: ProductStatus,
}

// Saldo atual + o que ainda vai chegar (faturas de fornecedor em aberto)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedInventoryEntry {
    pub product_id: Uuid,
    pub name: String,
    pub current_stock: i32,
    #[schema(example = "12")]
    pub incoming: Decimal,
    #[schema(example = "52")]
    pub expected_stock: Decimal,
}
