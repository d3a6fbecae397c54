// src/services/line_items.rs
//
// Cálculo das linhas de fatura. Funções puras: recebem a lista, devolvem a lista nova.
// O editor não retorna erro; a validação acontece antes (payload) ou depois (repositório).
// Multiplicações usam checked_mul: estouro vira erro (recompute) ou edição ignorada (editor).

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        inventory::Product,
        invoice::{InvoiceItem, LineItem, TaxBreakdown},
    },
};

// Imposto aplicado só na exportação de faturas de cliente
pub const TAX_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

pub trait LineAmount {
    fn amount(&self) -> Decimal;
}

impl LineAmount for LineItem {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl LineAmount for InvoiceItem {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Campo alterado numa linha.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LineItemEdit {
    Quantity(Decimal),
    UnitPrice(Decimal),
    Product(Uuid),
    Description(String),
}

/// `quantity * unit_price`, ou `None` se o resultado não cabe num Decimal.
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Option<Decimal> {
    quantity.checked_mul(unit_price)
}

// Recalcula o valor da linha; se estourar, fica o `fallback`
fn with_amount(mut item: LineItem, fallback: LineItem) -> LineItem {
    match line_amount(item.quantity, item.unit_price) {
        Some(amount) => {
            item.amount = amount;
            item
        }
        None => fallback,
    }
}

pub fn update_line_item(items: &[LineItem], index: usize, edit: LineItemEdit, products: &[Product]) -> Vec<LineItem> {
    let Some(original) = items.get(index) else {
        return items.to_vec();
    };

    let mut item = original.clone();
    let item = match edit {
        LineItemEdit::Quantity(quantity) => {
            item.quantity = quantity;
            with_amount(item, original.clone())
        }
        LineItemEdit::UnitPrice(unit_price) => {
            item.unit_price = unit_price;
            with_amount(item, original.clone())
        }
        LineItemEdit::Product(product_id) => {
            item.product_id = Some(product_id);
            // Produto desconhecido: só registra o id
            match products.iter().find(|p| p.id == product_id) {
                Some(product) => {
                    let fallback = item.clone();
                    item.description = product.name.clone();
                    item.unit_price = product.price;
                    with_amount(item, fallback)
                }
                None => item,
            }
        }
        LineItemEdit::Description(description) => {
            item.description = description;
            item
        }
    };

    let mut items = items.to_vec();
    items[index] = item;
    items
}

pub fn add_line_item(items: &[LineItem]) -> Vec<LineItem> {
    let mut items = items.to_vec();
    items.push(LineItem::default());
    items
}

/// Remove a linha, exceto a última que sobrou.
pub fn remove_line_item(items: &[LineItem], index: usize) -> Vec<LineItem> {
    let mut items = items.to_vec();
    if items.len() > 1 && index < items.len() {
        items.remove(index);
    }
    items
}

pub fn compute_total<T: LineAmount>(items: &[T]) -> Decimal {
    items.iter().map(LineAmount::amount).sum()
}

/// Normaliza `amount` de todas as linhas recebidas.
pub fn recompute_amounts(items: &mut [LineItem]) -> Result<(), AppError> {
    for (index, item) in items.iter_mut().enumerate() {
        item.amount = line_amount(item.quantity, item.unit_price)
            .ok_or_else(|| AppError::InvalidLineItem(format!("items[{}].amount overflows", index)))?;
    }
    Ok(())
}

pub fn tax_breakdown(total: Decimal) -> TaxBreakdown {
    let tax = total * TAX_RATE;
    TaxBreakdown {
        subtotal: total,
        tax,
        grand_total: total + tax,
    }
}
