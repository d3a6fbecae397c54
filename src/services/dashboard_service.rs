// src/services/dashboard_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, Repository, Scope},
    models::{
        crm::{Client, Supplier},
        dashboard::DashboardSummary,
        inventory::{Product, StockLevel},
        invoice::{Invoice, InvoiceStatus, SupplierInvoice, SupplierInvoiceStatus},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    clients: Arc<dyn Repository<Client>>,
    suppliers: Arc<dyn Repository<Supplier>>,
    products: Arc<dyn Repository<Product>>,
    invoices: Arc<dyn InvoiceRepository<Invoice>>,
    supplier_invoices: Arc<dyn InvoiceRepository<SupplierInvoice>>,
    low_stock_threshold: i32,
}

impl DashboardService {
    pub fn new(
        clients: Arc<dyn Repository<Client>>,
        suppliers: Arc<dyn Repository<Supplier>>,
        products: Arc<dyn Repository<Product>>,
        invoices: Arc<dyn InvoiceRepository<Invoice>>,
        supplier_invoices: Arc<dyn InvoiceRepository<SupplierInvoice>>,
        low_stock_threshold: i32,
    ) -> Self {
        Self { clients, suppliers, products, invoices, supplier_invoices, low_stock_threshold }
    }

    pub async fn summary(&self, scope: Scope) -> Result<DashboardSummary, AppError> {
        let clients = self.clients.list(scope).await?;
        let suppliers = self.suppliers.list(scope).await?;
        let products = self.products.list(scope).await?;
        let invoices = self.invoices.list(scope).await?;
        let supplier_invoices = self.supplier_invoices.list(scope).await?;

        let low_stock_products = products
            .iter()
            .filter(|p| StockLevel::classify(p.stock, self.low_stock_threshold) != StockLevel::InStock)
            .count();

        let sum = |statuses: &[InvoiceStatus]| -> Decimal {
            invoices
                .iter()
                .filter(|i| statuses.contains(&i.status))
                .map(|i| i.total_amount)
                .sum()
        };

        let supplier_spend = supplier_invoices
            .iter()
            .filter(|i| i.status == SupplierInvoiceStatus::Paid)
            .map(|i| i.total_amount)
            .sum();

        Ok(DashboardSummary {
            clients: clients.len(),
            suppliers: suppliers.len(),
            products: products.len(),
            low_stock_products,
            invoices: invoices.len(),
            revenue: sum(&[InvoiceStatus::Paid]),
            outstanding: sum(&[InvoiceStatus::Pending, InvoiceStatus::Overdue]),
            supplier_spend,
        })
    }
}
