// src/services/invoice_service.rs
//
// Ciclo de vida das faturas, o mesmo para cliente e fornecedor.

use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{Billable, Entity, InvoiceRepository, Repository, Scope},
    models::invoice::{
        CreateInvoicePayload, CreateSupplierInvoicePayload, InvoiceHeader, InvoiceHeaderPatch, InvoiceStatus,
        LineItem, SupplierInvoiceStatus, UpdateInvoicePayload, UpdateSupplierInvoicePayload,
    },
    services::line_items::recompute_amounts,
};

/// Gera `prefixo + millis`, sempre crescente dentro do processo.
#[derive(Debug, Default)]
pub struct NumberSequence {
    last: AtomicI64,
}

impl NumberSequence {
    pub fn next(&self, prefix: &str) -> String {
        let now = Utc::now().timestamp_millis();
        // Duas faturas no mesmo milissegundo: a segunda pega o próximo
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or_else(|last| last);
        format!("{}{}", prefix, now.max(previous + 1))
    }
}

/// Fatura nova, já sem os nomes específicos de cliente/fornecedor.
#[derive(Debug, Clone)]
pub struct InvoiceDraft<S> {
    pub party_id: Uuid,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: Option<S>,
    pub notes: Option<String>,
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone)]
pub struct InvoiceChanges<S> {
    pub patch: InvoiceHeaderPatch<S>,
    pub items: Option<Vec<LineItem>>,
}

impl From<CreateInvoicePayload> for InvoiceDraft<InvoiceStatus> {
    fn from(p: CreateInvoicePayload) -> Self {
        Self { party_id: p.client_id, date: p.date, due_date: p.due_date, status: p.status, notes: p.notes, items: p.items }
    }
}

impl From<CreateSupplierInvoicePayload> for InvoiceDraft<SupplierInvoiceStatus> {
    fn from(p: CreateSupplierInvoicePayload) -> Self {
        Self { party_id: p.supplier_id, date: p.date, due_date: p.due_date, status: p.status, notes: p.notes, items: p.items }
    }
}

impl From<UpdateInvoicePayload> for InvoiceChanges<InvoiceStatus> {
    fn from(p: UpdateInvoicePayload) -> Self {
        Self {
            patch: InvoiceHeaderPatch {
                party_id: p.client_id,
                date: p.date,
                due_date: p.due_date,
                status: p.status,
                notes: p.notes,
            },
            items: p.items,
        }
    }
}

impl From<UpdateSupplierInvoicePayload> for InvoiceChanges<SupplierInvoiceStatus> {
    fn from(p: UpdateSupplierInvoicePayload) -> Self {
        Self {
            patch: InvoiceHeaderPatch {
                party_id: p.supplier_id,
                date: p.date,
                due_date: p.due_date,
                status: p.status,
                notes: p.notes,
            },
            items: p.items,
        }
    }
}

fn require_items(items: &[LineItem]) -> Result<(), AppError> {
    if items.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "items",
            ValidationError::new("length").with_message(Cow::Borrowed("at_least_one_item")),
        );
        return Err(AppError::ValidationError(errors));
    }
    Ok(())
}

pub struct InvoiceService<E: Billable> {
    invoices: Arc<dyn InvoiceRepository<E>>,
    parties: Arc<dyn Repository<E::Party>>,
    sequence: Arc<NumberSequence>,
}

impl<E: Billable> Clone for InvoiceService<E> {
    fn clone(&self) -> Self {
        Self {
            invoices: Arc::clone(&self.invoices),
            parties: Arc::clone(&self.parties),
            sequence: Arc::clone(&self.sequence),
        }
    }
}

impl<E: Billable> InvoiceService<E> {
    pub fn new(invoices: Arc<dyn InvoiceRepository<E>>, parties: Arc<dyn Repository<E::Party>>) -> Self {
        Self { invoices, parties, sequence: Arc::new(NumberSequence::default()) }
    }

    pub async fn list(&self, scope: Scope) -> Result<Vec<E>, AppError> {
        self.invoices.list(scope).await
    }

    pub async fn get(&self, scope: Scope, id: Uuid) -> Result<E, AppError> {
        self.invoices.get_in(scope, id).await
    }

    // Cliente/fornecedor precisa existir dentro da empresa da fatura
    async fn ensure_party(&self, party_id: Uuid, company_id: Uuid) -> Result<(), AppError> {
        let party = self.parties.get(party_id).await?;
        if party.company_id() != Some(company_id) {
            return Err(AppError::NotFound(<E::Party as Entity>::KIND));
        }
        Ok(())
    }

    pub async fn create(&self, scope: Scope, draft: InvoiceDraft<E::Status>) -> Result<E, AppError> {
        let company_id = scope.target_company()?;
        require_items(&draft.items)?;
        self.ensure_party(draft.party_id, company_id).await?;

        let mut items = draft.items;
        recompute_amounts(&mut items)?;

        let header = E::header(InvoiceHeader {
            number: self.sequence.next(E::NUMBER_PREFIX),
            party_id: draft.party_id,
            date: draft.date,
            due_date: draft.due_date,
            status: draft.status.unwrap_or_default(),
            notes: draft.notes,
        });

        let invoice = self.invoices.create_with_items(company_id, header, items).await?;
        tracing::info!("🧾 {} {} criada (total {})", E::KIND, invoice.number(), invoice.total_amount());
        Ok(invoice)
    }

    /// Patch do cabeçalho; se vierem linhas, substitui todas e recalcula o total.
    pub async fn update(&self, scope: Scope, id: Uuid, changes: InvoiceChanges<E::Status>) -> Result<E, AppError> {
        let existing = self.invoices.get_in(scope, id).await?;

        let mut items = changes.items;
        if let Some(items) = items.as_mut() {
            require_items(items)?;
            // Antes do patch: linha inválida não deixa o cabeçalho meio alterado
            recompute_amounts(items)?;
        }
        if let (Some(party_id), Some(company_id)) = (changes.patch.party_id, existing.company_id()) {
            self.ensure_party(party_id, company_id).await?;
        }

        let mut invoice = self.invoices.update(id, E::patch(changes.patch)).await?;

        if let Some(items) = items {
            invoice = self.invoices.replace_items(id, items).await?;
        }
        Ok(invoice)
    }

    pub async fn delete(&self, scope: Scope, id: Uuid) -> Result<E, AppError> {
        self.invoices.get_in(scope, id).await?;
        let invoice = self.invoices.delete(id).await?;
        tracing::info!("🗑️ {} {} removida", E::KIND, invoice.number());
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::Store,
        models::{
            crm::{Client, NewClient},
            invoice::Invoice,
        },
    };
    use rust_decimal::Decimal;

    fn line(quantity: i64, unit_price: i64) -> LineItem {
        LineItem {
            description: "Café".into(),
            quantity: Decimal::from(quantity),
            unit_price: Decimal::from(unit_price),
            // Valor errado de propósito: o serviço recalcula
            amount: Decimal::from(1),
            ..LineItem::default()
        }
    }

    fn draft(client_id: Uuid, items: Vec<LineItem>) -> InvoiceDraft<InvoiceStatus> {
        InvoiceDraft {
            party_id: client_id,
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            status: None,
            notes: None,
            items,
        }
    }

    async fn setup() -> (InvoiceService<Invoice>, Uuid, Client) {
        let store = Store::memory();
        let company = Uuid::new_v4();
        let client = store
            .clients
            .create(Some(company), NewClient { name: "Padaria".into(), email: None, phone: None, address: None })
            .await
            .unwrap();
        (InvoiceService::new(store.invoices, store.clients), company, client)
    }

    #[test]
    fn numbers_are_prefixed_and_increasing() {
        let sequence = NumberSequence::default();
        let first = sequence.next("INV-");
        let second = sequence.next("INV-");

        assert!(first.starts_with("INV-"));
        let parse = |n: &str| n.trim_start_matches("INV-").parse::<i64>().unwrap();
        assert!(parse(&second) > parse(&first));
    }

    #[tokio::test]
    async fn create_normalizes_amounts_and_total() {
        let (service, company, client) = setup().await;

        let invoice = service
            .create(Scope::Company(company), draft(client.id, vec![line(2, 25), line(1, 100)]))
            .await
            .unwrap();

        assert!(invoice.number.starts_with("INV-"));
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.items[0].amount, Decimal::from(50));
        assert_eq!(invoice.total_amount, Decimal::from(150));
    }

    #[tokio::test]
    async fn create_needs_a_target_company() {
        let (service, _, client) = setup().await;
        let result = service.create(Scope::All, draft(client.id, vec![line(1, 1)])).await;
        assert!(matches!(result, Err(AppError::CompanyRequired)));
    }

    #[tokio::test]
    async fn create_rejects_empty_items_and_foreign_clients() {
        let (service, company, client) = setup().await;

        let empty = service.create(Scope::Company(company), draft(client.id, vec![])).await;
        assert!(matches!(empty, Err(AppError::ValidationError(_))));

        let foreign = service.create(Scope::Company(Uuid::new_v4()), draft(client.id, vec![line(1, 1)])).await;
        assert!(matches!(foreign, Err(AppError::NotFound("client"))));
    }

    #[tokio::test]
    async fn update_replaces_items_and_keeps_total_in_sync() {
        let (service, company, client) = setup().await;
        let invoice = service
            .create(Scope::Company(company), draft(client.id, vec![line(2, 25)]))
            .await
            .unwrap();

        let changes = InvoiceChanges {
            patch: InvoiceHeaderPatch { status: Some(InvoiceStatus::Paid), ..Default::default() },
            items: Some(vec![line(3, 25), line(1, 5)]),
        };
        let updated = service.update(Scope::Company(company), invoice.id, changes).await.unwrap();

        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.total_amount, Decimal::from(80));
    }

    #[tokio::test]
    async fn header_only_update_keeps_items() {
        let (service, company, client) = setup().await;
        let invoice = service
            .create(Scope::Company(company), draft(client.id, vec![line(2, 25)]))
            .await
            .unwrap();

        let changes = InvoiceChanges {
            patch: InvoiceHeaderPatch { notes: Some("Pagar no PIX".into()), ..Default::default() },
            items: None,
        };
        let updated = service.update(Scope::Company(company), invoice.id, changes).await.unwrap();

        assert_eq!(updated.notes.as_deref(), Some("Pagar no PIX"));
        assert_eq!(updated.total_amount, Decimal::from(50));
    }

    #[tokio::test]
    async fn delete_of_missing_invoice_is_not_found() {
        let (service, company, _) = setup().await;
        let result = service.delete(Scope::Company(company), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound("invoice"))));
    }

    #[tokio::test]
    async fn invoices_of_other_companies_are_out_of_reach() {
        let (service, company, client) = setup().await;
        let invoice = service
            .create(Scope::Company(company), draft(client.id, vec![line(2, 25)]))
            .await
            .unwrap();
        let stranger = Scope::Company(Uuid::new_v4());

        assert!(matches!(service.get(stranger, invoice.id).await, Err(AppError::NotFound("invoice"))));
        assert!(matches!(service.delete(stranger, invoice.id).await, Err(AppError::NotFound("invoice"))));
        assert!(service.get(Scope::Company(company), invoice.id).await.is_ok());
    }

    #[tokio::test]
    async fn overflowing_items_leave_the_invoice_untouched() {
        let (service, company, client) = setup().await;
        let scope = Scope::Company(company);
        let invoice = service.create(scope, draft(client.id, vec![line(2, 25)])).await.unwrap();

        let huge = LineItem {
            description: "Ouro".into(),
            quantity: "20000000000000000000".parse().unwrap(),
            unit_price: "10000000000000000000".parse().unwrap(),
            ..LineItem::default()
        };
        let changes = InvoiceChanges {
            patch: InvoiceHeaderPatch { status: Some(InvoiceStatus::Paid), ..Default::default() },
            items: Some(vec![huge]),
        };
        assert!(service.update(scope, invoice.id, changes).await.is_err());

        // Nem o cabeçalho mudou
        let stored = service.get(scope, invoice.id).await.unwrap();
        assert_eq!(stored.status, InvoiceStatus::Draft);
        assert_eq!(stored.total_amount, Decimal::from(50));
    }
}
