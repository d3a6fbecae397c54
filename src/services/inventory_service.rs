// src/services/inventory_service.rs

use std::{collections::HashMap, sync::Arc};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, Repository, Scope},
    models::{
        inventory::{ExpectedInventoryEntry, InventoryEntry, Product, StockLevel},
        invoice::{SupplierInvoice, SupplierInvoiceStatus},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    products: Arc<dyn Repository<Product>>,
    supplier_invoices: Arc<dyn InvoiceRepository<SupplierInvoice>>,
    low_stock_threshold: i32,
}

impl InventoryService {
    pub fn new(
        products: Arc<dyn Repository<Product>>,
        supplier_invoices: Arc<dyn InvoiceRepository<SupplierInvoice>>,
        low_stock_threshold: i32,
    ) -> Self {
        Self { products, supplier_invoices, low_stock_threshold }
    }

    pub async fn get_inventory(&self, scope: Scope) -> Result<Vec<InventoryEntry>, AppError> {
        let products = self.products.list(scope).await?;

        Ok(products
            .into_iter()
            .map(|p| InventoryEntry {
                level: StockLevel::classify(p.stock, self.low_stock_threshold),
                // Valor exibido: satura em vez de estourar
                stock_value: p.price.saturating_mul(Decimal::from(p.stock)),
                product_id: p.id,
                name: p.name,
                category: p.category,
                stock: p.stock,
                price: p.price,
                status: p.status,
            })
            .collect())
    }

    /// Saldo atual + quantidades em faturas de fornecedor ainda abertas (draft/pending).
    pub async fn get_expected_inventory(&self, scope: Scope) -> Result<Vec<ExpectedInventoryEntry>, AppError> {
        let products = self.products.list(scope).await?;
        let invoices = self.supplier_invoices.list(scope).await?;

        let mut incoming: HashMap<Uuid, Decimal> = HashMap::new();
        for invoice in invoices
            .iter()
            .filter(|i| matches!(i.status, SupplierInvoiceStatus::Draft | SupplierInvoiceStatus::Pending))
        {
            for item in &invoice.items {
                if let Some(product_id) = item.product_id {
                    *incoming.entry(product_id).or_default() += item.quantity;
                }
            }
        }

        Ok(products
            .into_iter()
            .map(|p| {
                let incoming = incoming.get(&p.id).copied().unwrap_or_default();
                ExpectedInventoryEntry {
                    product_id: p.id,
                    name: p.name,
                    current_stock: p.stock,
                    incoming,
                    expected_stock: Decimal::from(p.stock) + incoming,
                }
            })
            .collect())
    }

    pub fn low_stock_threshold(&self) -> i32 {
        self.low_stock_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{InvoiceRepository, MemoryRepository},
        models::{
            inventory::{NewProduct, ProductStatus},
            invoice::{InvoiceHeader, LineItem},
        },
    };
    use chrono::NaiveDate;

    fn new_product(name: &str, stock: i32) -> NewProduct {
        NewProduct {
            name: name.into(),
            category: "Mercearia".into(),
            price: Decimal::from(10),
            stock,
            status: ProductStatus::Active,
        }
    }

    fn header(number: &str, status: SupplierInvoiceStatus) -> InvoiceHeader<SupplierInvoiceStatus> {
        InvoiceHeader {
            number: number.into(),
            party_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            status,
            notes: None,
        }
    }

    fn line(product_id: Uuid, quantity: i64) -> LineItem {
        LineItem {
            product_id: Some(product_id),
            description: "Reposição".into(),
            quantity: Decimal::from(quantity),
            unit_price: Decimal::from(4),
            ..LineItem::default()
        }
    }

    #[tokio::test]
    async fn stock_levels_follow_the_threshold() {
        let products = MemoryRepository::<Product>::new();
        let company = Uuid::new_v4();
        for (name, stock) in [("Cheio", 50), ("Baixo", 3), ("Zerado", 0)] {
            products.create(Some(company), new_product(name, stock)).await.unwrap();
        }
        let service = InventoryService::new(Arc::new(products), Arc::new(MemoryRepository::<SupplierInvoice>::new()), 10);

        let levels: Vec<_> = service
            .get_inventory(Scope::Company(company))
            .await
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.level))
            .collect();

        assert_eq!(
            levels,
            vec![
                ("Cheio".to_string(), StockLevel::InStock),
                ("Baixo".to_string(), StockLevel::LowStock),
                ("Zerado".to_string(), StockLevel::OutOfStock),
            ]
        );
    }

    #[tokio::test]
    async fn expected_stock_counts_only_open_supplier_invoices() {
        let products = MemoryRepository::<Product>::new();
        let invoices = MemoryRepository::<SupplierInvoice>::new();
        let company = Uuid::new_v4();
        let coffee = products.create(Some(company), new_product("Café", 40)).await.unwrap();

        invoices
            .create_with_items(company, header("SINV-1", SupplierInvoiceStatus::Pending), vec![line(coffee.id, 12)])
            .await
            .unwrap();
        invoices
            .create_with_items(company, header("SINV-2", SupplierInvoiceStatus::Paid), vec![line(coffee.id, 100)])
            .await
            .unwrap();

        let service = InventoryService::new(Arc::new(products), Arc::new(invoices), 10);
        let expected = service.get_expected_inventory(Scope::Company(company)).await.unwrap();

        assert_eq!(expected.len(), 1);
        assert_eq!(expected[0].current_stock, 40);
        assert_eq!(expected[0].incoming, Decimal::from(12));
        assert_eq!(expected[0].expected_stock, Decimal::from(52));
    }
}
