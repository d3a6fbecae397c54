// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(example = 12)]
    pub clients: usize,
    #[schema(example = 4)]
    pub suppliers: usize,
    #[schema(example = 80)]
    pub products: usize,
    #[schema(example = 3)]
    pub low_stock_products: usize,
    #[schema(example = 25)]
    pub invoices: usize,

    // Faturas pagas
    #[schema(example = "15000.00")]
    pub revenue: Decimal,

    // Pendentes + vencidas
    #[schema(example = "3200.00")]
    pub outstanding: Decimal,

    // Faturas de fornecedor pagas
    #[schema(example = "8700.00")]
    pub supplier_spend: Decimal,
}
