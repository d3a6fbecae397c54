// src/db/mod.rs
//
// Contrato do armazenamento. Os serviços dependem só destes traits; o backend
// (memória ou Postgres) é escolhido na inicialização.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{MAX_PRICE, MAX_QUANTITY},
    },
    models::{
        auth::{NewAccount, RegisteredAccount, UserAccount},
        company::Company,
        crm::{Client, Supplier},
        inventory::Product,
        invoice::{Invoice, InvoiceHeader, InvoiceHeaderPatch, InvoiceItem, LineItem, SupplierInvoice},
        profile::Profile,
    },
};

pub mod entities;
pub mod memory;
pub mod postgres;

pub use memory::{MemoryAccountRepository, MemoryRepository};
pub use postgres::{PgAccountRepository, PgRepository};

/// Recorte de empresa aplicado às listagens e às operações por id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    // Só super_admin chega aqui
    All,
    Company(Uuid),
}

impl Scope {
    pub fn includes(&self, company_id: Option<Uuid>) -> bool {
        match self {
            Scope::All => true,
            Scope::Company(id) => company_id == Some(*id),
        }
    }

    pub fn company_id(&self) -> Option<Uuid> {
        match self {
            Scope::All => None,
            Scope::Company(id) => Some(*id),
        }
    }

    /// Empresa alvo para gravações.
    pub fn target_company(&self) -> Result<Uuid, AppError> {
        self.company_id().ok_or(AppError::CompanyRequired)
    }
}

pub trait Entity: Clone + Send + Sync + 'static {
    type Create: Send + Sync + 'static;
    type Update: Send + Sync + 'static;

    // Usado nas mensagens de "não encontrado"
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn company_id(&self) -> Option<Uuid>;

    /// Chave única além do id (número da fatura, username).
    fn unique_key(&self) -> Option<String> {
        None
    }

    fn build(id: Uuid, company_id: Option<Uuid>, input: Self::Create, now: DateTime<Utc>) -> Result<Self, AppError>;
    fn apply(&mut self, input: Self::Update, now: DateTime<Utc>);
}

/// Faturas de cliente e de fornecedor: cabeçalho + linhas + total derivado.
pub trait Billable: Entity {
    type Status: Copy + Default + PartialEq + Send + Sync + 'static;
    type Party: Entity;

    const NUMBER_PREFIX: &'static str;

    fn number(&self) -> &str;
    fn party_id(&self) -> Uuid;
    fn status(&self) -> Self::Status;
    fn total_amount(&self) -> Decimal;
    fn items(&self) -> &[InvoiceItem];
    fn items_mut(&mut self) -> &mut Vec<InvoiceItem>;
    fn set_total(&mut self, total: Decimal);

    fn header(header: InvoiceHeader<Self::Status>) -> Self::Create;
    fn patch(patch: InvoiceHeaderPatch<Self::Status>) -> Self::Update;
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn list(&self, scope: Scope) -> Result<Vec<E>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, AppError>;
    async fn create(&self, company_id: Option<Uuid>, input: E::Create) -> Result<E, AppError>;
    async fn update(&self, id: Uuid, input: E::Update) -> Result<E, AppError>;
    async fn delete(&self, id: Uuid) -> Result<E, AppError>;

    async fn get(&self, id: Uuid) -> Result<E, AppError> {
        self.find_by_id(id).await?.ok_or(AppError::NotFound(E::KIND))
    }

    /// `get` dentro do recorte. Linha de outra empresa = `NotFound`.
    async fn get_in(&self, scope: Scope, id: Uuid) -> Result<E, AppError> {
        let row = self.get(id).await?;
        if !scope.includes(row.company_id()) {
            return Err(AppError::NotFound(E::KIND));
        }
        Ok(row)
    }
}

#[async_trait]
pub trait InvoiceRepository<E: Billable>: Repository<E> {
    /// Cabeçalho + linhas numa única gravação.
    async fn create_with_items(&self, company_id: Uuid, header: E::Create, items: Vec<LineItem>) -> Result<E, AppError>;

    /// Segundo passo da criação em duas etapas. Não desfaz o cabeçalho se falhar.
    async fn insert_items(&self, invoice_id: Uuid, items: Vec<LineItem>) -> Result<E, AppError>;

    async fn replace_items(&self, invoice_id: Uuid, items: Vec<LineItem>) -> Result<E, AppError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, AppError>;

    /// Conta + empresa (opcional) + perfil, tudo ou nada.
    async fn register(&self, account: NewAccount) -> Result<RegisteredAccount, AppError>;
}

// Regras que o armazenamento garante para as linhas
pub(crate) fn check_line_items(items: &[LineItem]) -> Result<(), AppError> {
    for (index, item) in items.iter().enumerate() {
        if item.quantity < Decimal::ONE {
            return Err(AppError::InvalidLineItem(format!("items[{}].quantity < 1", index)));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(AppError::InvalidLineItem(format!("items[{}].unitPrice < 0", index)));
        }
        if item.quantity > MAX_QUANTITY || item.unit_price > MAX_PRICE {
            return Err(AppError::InvalidLineItem(format!("items[{}] above the maximum", index)));
        }
    }
    Ok(())
}

// --- O conjunto de repositórios injetado no AppState ---

#[derive(Clone)]
pub struct Store {
    pub accounts: Arc<dyn AccountRepository>,
    pub companies: Arc<dyn Repository<Company>>,
    pub profiles: Arc<dyn Repository<Profile>>,
    pub clients: Arc<dyn Repository<Client>>,
    pub suppliers: Arc<dyn Repository<Supplier>>,
    pub products: Arc<dyn Repository<Product>>,
    pub invoices: Arc<dyn InvoiceRepository<Invoice>>,
    pub supplier_invoices: Arc<dyn InvoiceRepository<SupplierInvoice>>,
}

impl Store {
    pub fn memory() -> Self {
        let companies = MemoryRepository::<Company>::new();
        let profiles = MemoryRepository::<Profile>::new();

        Self {
            accounts: Arc::new(MemoryAccountRepository::new(companies.clone(), profiles.clone())),
            companies: Arc::new(companies),
            profiles: Arc::new(profiles),
            clients: Arc::new(MemoryRepository::<Client>::new()),
            suppliers: Arc::new(MemoryRepository::<Supplier>::new()),
            products: Arc::new(MemoryRepository::<Product>::new()),
            invoices: Arc::new(MemoryRepository::<Invoice>::new()),
            supplier_invoices: Arc::new(MemoryRepository::<SupplierInvoice>::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PgAccountRepository::new(pool.clone())),
            companies: Arc::new(PgRepository::<Company>::new(pool.clone())),
            profiles: Arc::new(PgRepository::<Profile>::new(pool.clone())),
            clients: Arc::new(PgRepository::<Client>::new(pool.clone())),
            suppliers: Arc::new(PgRepository::<Supplier>::new(pool.clone())),
            products: Arc::new(PgRepository::<Product>::new(pool.clone())),
            invoices: Arc::new(PgRepository::<Invoice>::new(pool.clone())),
            supplier_invoices: Arc::new(PgRepository::<SupplierInvoice>::new(pool)),
        }
    }
}
