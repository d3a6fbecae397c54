// src/db/memory.rs
//
// Backend em memória: um Vec por entidade atrás de um RwLock do tokio.
// É o padrão quando não há DATABASE_URL e é o que os testes usam.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{check_line_items, AccountRepository, Billable, Entity, InvoiceRepository, Repository, Scope},
    models::{
        auth::{NewAccount, RegisteredAccount, UserAccount},
        company::{Company, NewCompany},
        invoice::{InvoiceItem, LineItem},
        profile::{NewProfile, Profile},
    },
    services::line_items::compute_total,
};

pub struct MemoryRepository<E> {
    rows: Arc<RwLock<Vec<E>>>,
}

// Manual: `E` não precisa ser Clone para clonar o Arc
impl<E> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        Self { rows: Arc::clone(&self.rows) }
    }
}

impl<E: Entity> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self { rows: Arc::new(RwLock::new(Vec::new())) }
    }

    pub(crate) fn rows(&self) -> &Arc<RwLock<Vec<E>>> {
        &self.rows
    }
}

fn ensure_unique<E: Entity>(rows: &[E], candidate: &E) -> Result<(), AppError> {
    for row in rows.iter().filter(|row| row.id() != candidate.id()) {
        if let (Some(existing), Some(key)) = (row.unique_key(), candidate.unique_key()) {
            if existing == key {
                return Err(AppError::UniqueConstraintViolation(key));
            }
        }
    }
    Ok(())
}

fn build_lines(invoice_id: Uuid, items: &[LineItem]) -> Result<Vec<InvoiceItem>, AppError> {
    items.iter().map(|line| InvoiceItem::from_line(invoice_id, line)).collect()
}

fn attach_items<E: Billable>(invoice: &mut E, lines: Vec<InvoiceItem>) {
    invoice.items_mut().extend(lines);
    let total = compute_total(invoice.items());
    invoice.set_total(total);
}

#[async_trait]
impl<E: Entity> Repository<E> for MemoryRepository<E> {
    async fn list(&self, scope: Scope) -> Result<Vec<E>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| scope.includes(row.company_id())).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn create(&self, company_id: Option<Uuid>, input: E::Create) -> Result<E, AppError> {
        let entity = E::build(Uuid::new_v4(), company_id, input, Utc::now())?;

        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id() == entity.id()) {
            return Err(AppError::UniqueConstraintViolation(entity.id().to_string()));
        }
        ensure_unique(&rows, &entity)?;
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: Uuid, input: E::Update) -> Result<E, AppError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(AppError::NotFound(E::KIND))?;

        let mut updated = rows[index].clone();
        updated.apply(input, Utc::now());
        ensure_unique(&rows, &updated)?;
        rows[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<E, AppError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.id() == id)
            .ok_or(AppError::NotFound(E::KIND))?;
        Ok(rows.remove(index))
    }
}

#[async_trait]
impl<E: Billable> InvoiceRepository<E> for MemoryRepository<E> {
    async fn create_with_items(&self, company_id: Uuid, header: E::Create, items: Vec<LineItem>) -> Result<E, AppError> {
        check_line_items(&items)?;
        let mut invoice = E::build(Uuid::new_v4(), Some(company_id), header, Utc::now())?;
        let lines = build_lines(invoice.id(), &items)?;
        attach_items(&mut invoice, lines);

        let mut rows = self.rows.write().await;
        ensure_unique(&rows, &invoice)?;
        rows.push(invoice.clone());
        Ok(invoice)
    }

    async fn insert_items(&self, invoice_id: Uuid, items: Vec<LineItem>) -> Result<E, AppError> {
        let mut rows = self.rows.write().await;
        let invoice = rows
            .iter_mut()
            .find(|row| row.id() == invoice_id)
            .ok_or(AppError::NotFound(E::KIND))?;

        check_line_items(&items)?;
        let lines = build_lines(invoice_id, &items)?;
        attach_items(invoice, lines);
        Ok(invoice.clone())
    }

    async fn replace_items(&self, invoice_id: Uuid, items: Vec<LineItem>) -> Result<E, AppError> {
        check_line_items(&items)?;

        let mut rows = self.rows.write().await;
        let invoice = rows
            .iter_mut()
            .find(|row| row.id() == invoice_id)
            .ok_or(AppError::NotFound(E::KIND))?;

        // Monta antes de limpar: uma linha inválida não apaga as atuais
        let lines = build_lines(invoice_id, &items)?;
        invoice.items_mut().clear();
        attach_items(invoice, lines);
        Ok(invoice.clone())
    }
}

// --- Contas ---

/// Contas em memória. Compartilha empresas e perfis com os repositórios do `Store`.
#[derive(Clone)]
pub struct MemoryAccountRepository {
    users: Arc<RwLock<Vec<UserAccount>>>,
    companies: MemoryRepository<Company>,
    profiles: MemoryRepository<Profile>,
}

impl MemoryAccountRepository {
    pub fn new(companies: MemoryRepository<Company>, profiles: MemoryRepository<Profile>) -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            companies,
            profiles,
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn register(&self, account: NewAccount) -> Result<RegisteredAccount, AppError> {
        // Sempre na mesma ordem: usuários -> empresas -> perfis
        let mut users = self.users.write().await;
        let mut companies = self.companies.rows().write().await;
        let mut profiles = self.profiles.rows().write().await;

        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&account.email)) {
            return Err(AppError::EmailAlreadyExists);
        }
        if profiles.iter().any(|p| p.username == account.username) {
            return Err(AppError::UniqueConstraintViolation(account.username));
        }

        let now = Utc::now();
        let user = UserAccount {
            id: Uuid::new_v4(),
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
        };

        let company = account
            .company_name
            .as_deref()
            .map(|name| Company::build(Uuid::new_v4(), None, NewCompany::named(name), now))
            .transpose()?;

        let profile = Profile::build(
            user.id,
            company.as_ref().map(|c| c.id),
            NewProfile {
                user_id: user.id,
                username: account.username,
                full_name: account.full_name,
                role: account.role,
            },
            now,
        )?;

        users.push(user.clone());
        if let Some(company) = &company {
            companies.push(company.clone());
        }
        profiles.push(profile.clone());

        Ok(RegisteredAccount { user, profile, company })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        crm::{Client, ClientUpdate, NewClient},
        invoice::{Invoice, InvoiceHeader, InvoiceStatus},
        profile::Role,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn new_client(name: &str) -> NewClient {
        NewClient { name: name.into(), email: None, phone: None, address: None }
    }

    fn header(number: &str) -> InvoiceHeader<InvoiceStatus> {
        InvoiceHeader {
            number: number.into(),
            party_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            status: InvoiceStatus::Draft,
            notes: None,
        }
    }

    fn line(quantity: i64, unit_price: i64) -> LineItem {
        LineItem {
            description: "Café".into(),
            quantity: Decimal::from(quantity),
            unit_price: Decimal::from(unit_price),
            ..LineItem::default()
        }
    }

    #[tokio::test]
    async fn list_respects_the_company_scope() {
        let repo = MemoryRepository::<Client>::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        repo.create(Some(a), new_client("A1")).await.unwrap();
        repo.create(Some(b), new_client("B1")).await.unwrap();
        repo.create(Some(a), new_client("A2")).await.unwrap();

        let names: Vec<_> = repo.list(Scope::Company(a)).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A1", "A2"]);
        assert_eq!(repo.list(Scope::All).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn create_without_company_is_rejected() {
        let repo = MemoryRepository::<Client>::new();
        let result = repo.create(None, new_client("Sem empresa")).await;
        assert!(matches!(result, Err(AppError::CompanyRequired)));
        assert!(repo.list(Scope::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = MemoryRepository::<Client>::new();
        let missing = Uuid::new_v4();

        let updated = repo.update(missing, ClientUpdate::default()).await;
        assert!(matches!(updated, Err(AppError::NotFound("client"))));
        assert!(matches!(repo.delete(missing).await, Err(AppError::NotFound("client"))));
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let repo = MemoryRepository::<Client>::new();
        let client = repo
            .create(Some(Uuid::new_v4()), NewClient { email: Some("a@b.com".into()), ..new_client("Padaria") })
            .await
            .unwrap();

        let updated = repo
            .update(client.id, ClientUpdate { name: Some("Padaria Nova".into()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(updated.name, "Padaria Nova");
        assert_eq!(updated.email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn invoice_numbers_are_unique() {
        let repo = MemoryRepository::<Invoice>::new();
        let company = Uuid::new_v4();
        repo.create_with_items(company, header("INV-1"), vec![line(1, 1)]).await.unwrap();

        let duplicate = repo.create_with_items(company, header("INV-1"), vec![line(1, 1)]).await;
        assert!(matches!(duplicate, Err(AppError::UniqueConstraintViolation(n)) if n == "INV-1"));
    }

    #[tokio::test]
    async fn create_with_items_stores_the_derived_total() {
        let repo = MemoryRepository::<Invoice>::new();
        let invoice = repo
            .create_with_items(Uuid::new_v4(), header("INV-2"), vec![line(2, 25), line(1, 100)])
            .await
            .unwrap();

        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].amount, Decimal::from(50));
        assert_eq!(invoice.total_amount, Decimal::from(150));
    }

    #[tokio::test]
    async fn create_with_bad_items_writes_nothing() {
        let repo = MemoryRepository::<Invoice>::new();
        let result = repo.create_with_items(Uuid::new_v4(), header("INV-3"), vec![line(0, 10)]).await;

        assert!(matches!(result, Err(AppError::InvalidLineItem(_))));
        assert!(repo.list(Scope::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn two_step_creation_can_leave_an_invoice_without_items() {
        let repo = MemoryRepository::<Invoice>::new();
        let company = Uuid::new_v4();

        let invoice = repo.create(Some(company), header("INV-4")).await.unwrap();
        let failed = repo.insert_items(invoice.id, vec![line(0, 25)]).await;
        assert!(matches!(failed, Err(AppError::InvalidLineItem(_))));

        let stored = repo.list(Scope::Company(company)).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, invoice.id);
        assert!(stored[0].items.is_empty());
        assert_eq!(stored[0].total_amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn replace_items_recomputes_the_total() {
        let repo = MemoryRepository::<Invoice>::new();
        let invoice = repo
            .create_with_items(Uuid::new_v4(), header("INV-5"), vec![line(2, 25)])
            .await
            .unwrap();

        let replaced = repo.replace_items(invoice.id, vec![line(3, 25)]).await.unwrap();

        assert_eq!(replaced.items.len(), 1);
        assert_eq!(replaced.total_amount, Decimal::from(75));
    }

    fn account(email: &str, username: &str, company: Option<&str>) -> NewAccount {
        NewAccount {
            email: email.into(),
            password_hash: "hash".into(),
            username: username.into(),
            full_name: "Maria".into(),
            company_name: company.map(str::to_string),
            role: if company.is_some() { Role::Admin } else { Role::Staff },
        }
    }

    #[tokio::test]
    async fn register_creates_company_and_profile_together() {
        let companies = MemoryRepository::<Company>::new();
        let profiles = MemoryRepository::<Profile>::new();
        let accounts = MemoryAccountRepository::new(companies.clone(), profiles.clone());

        let registered = accounts.register(account("maria@email.com", "maria", Some("Loja"))).await.unwrap();

        let company = registered.company.unwrap();
        assert_eq!(registered.profile.id, registered.user.id);
        assert_eq!(registered.profile.company_id, Some(company.id));
        assert_eq!(companies.get(company.id).await.unwrap().name, "Loja");
        assert_eq!(profiles.get(registered.user.id).await.unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn register_rejects_taken_email_and_username() {
        let companies = MemoryRepository::<Company>::new();
        let profiles = MemoryRepository::<Profile>::new();
        let accounts = MemoryAccountRepository::new(companies.clone(), profiles.clone());
        accounts.register(account("maria@email.com", "maria", None)).await.unwrap();

        let email = accounts.register(account("MARIA@email.com", "outra", Some("Loja"))).await;
        assert!(matches!(email, Err(AppError::EmailAlreadyExists)));

        let username = accounts.register(account("joao@email.com", "maria", None)).await;
        assert!(matches!(username, Err(AppError::UniqueConstraintViolation(_))));

        // Nada ficou pela metade
        assert!(companies.list(Scope::All).await.unwrap().is_empty());
        assert_eq!(profiles.list(Scope::All).await.unwrap().len(), 1);
    }
}
