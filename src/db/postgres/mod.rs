// src/db/postgres/mod.rs
//
// Backend Postgres. Um repositório genérico por entidade; o SQL específico de
// cada tabela fica em `entities.rs`.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{check_line_items, Billable, Entity, InvoiceRepository, Repository, Scope},
    models::invoice::{InvoiceItem, LineItem},
    services::line_items::compute_total,
};

mod accounts;
mod entities;

pub use accounts::PgAccountRepository;

/// O que uma entidade precisa para viver numa tabela.
#[async_trait]
pub trait PgEntity: Entity + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    // `companies` se recorta pelo próprio id
    const SCOPE_COLUMN: &'static str = "company_id";

    async fn insert(conn: &mut PgConnection, id: Uuid, company_id: Option<Uuid>, input: Self::Create) -> Result<Self, AppError>;
    async fn update(conn: &mut PgConnection, id: Uuid, input: Self::Update) -> Result<Option<Self>, AppError>;

    // Faturas carregam as linhas aqui
    async fn load_children(_conn: &mut PgConnection, _rows: &mut [Self]) -> Result<(), AppError> {
        Ok(())
    }
}

pub trait PgBillable: PgEntity + Billable {
    const ITEMS_TABLE: &'static str;
}

// Traduz violações de constraint para erros de domínio
pub(crate) fn map_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return AppError::UniqueConstraintViolation(constraint);
        }
        if db_err.is_check_violation() {
            let constraint = db_err.constraint().unwrap_or("check").to_string();
            return AppError::InvalidLineItem(constraint);
        }
    }
    e.into()
}

pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        Self { pool: self.pool.clone(), _entity: PhantomData }
    }
}

impl<E: PgEntity> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, _entity: PhantomData }
    }
}

async fn fetch_one_for_update<E: PgEntity>(conn: &mut PgConnection, id: Uuid) -> Result<E, AppError> {
    let sql = format!("SELECT * FROM {} WHERE id = $1 FOR UPDATE", E::TABLE);
    let mut row = sqlx::query_as::<_, E>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound(E::KIND))?;

    E::load_children(conn, std::slice::from_mut(&mut row)).await?;
    Ok(row)
}

#[async_trait]
impl<E: PgEntity> Repository<E> for PgRepository<E> {
    async fn list(&self, scope: Scope) -> Result<Vec<E>, AppError> {
        let sql = format!(
            "SELECT * FROM {} WHERE ($1::uuid IS NULL OR {} = $1) ORDER BY created_at ASC",
            E::TABLE,
            E::SCOPE_COLUMN
        );

        let mut conn = self.pool.acquire().await?;
        let mut rows = sqlx::query_as::<_, E>(&sql)
            .bind(scope.company_id())
            .fetch_all(&mut *conn)
            .await?;

        E::load_children(&mut conn, &mut rows).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);

        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(mut row) => {
                E::load_children(&mut conn, std::slice::from_mut(&mut row)).await?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, company_id: Option<Uuid>, input: E::Create) -> Result<E, AppError> {
        let mut conn = self.pool.acquire().await?;
        E::insert(&mut conn, Uuid::new_v4(), company_id, input).await
    }

    async fn update(&self, id: Uuid, input: E::Update) -> Result<E, AppError> {
        let mut conn = self.pool.acquire().await?;
        let mut row = E::update(&mut conn, id, input)
            .await?
            .ok_or(AppError::NotFound(E::KIND))?;

        E::load_children(&mut conn, std::slice::from_mut(&mut row)).await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<E, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lê antes de apagar para devolver a entidade completa (com linhas)
        let row = fetch_one_for_update::<E>(&mut tx, id).await?;

        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        sqlx::query(&sql).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(row)
    }
}

// --- Linhas de fatura ---

pub(crate) async fn load_items<E: PgBillable>(conn: &mut PgConnection, rows: &mut [E]) -> Result<(), AppError> {
    if rows.is_empty() {
        return Ok(());
    }

    let ids: Vec<Uuid> = rows.iter().map(Entity::id).collect();
    let sql = format!(
        "SELECT * FROM {} WHERE invoice_id = ANY($1) ORDER BY position ASC",
        E::ITEMS_TABLE
    );
    let items = sqlx::query_as::<_, InvoiceItem>(&sql)
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

    for row in rows.iter_mut() {
        let id = row.id();
        *row.items_mut() = items.iter().filter(|item| item.invoice_id == id).cloned().collect();
    }
    Ok(())
}

// Grava as linhas depois das existentes e recalcula o total a partir de todas
async fn write_items<E: PgBillable>(conn: &mut PgConnection, invoice_id: Uuid, items: &[LineItem]) -> Result<E, AppError> {
    let count_sql = format!("SELECT COUNT(*) FROM {} WHERE invoice_id = $1", E::ITEMS_TABLE);
    let existing: i64 = sqlx::query_scalar(&count_sql)
        .bind(invoice_id)
        .fetch_one(&mut *conn)
        .await?;

    let insert_sql = format!(
        "INSERT INTO {} (id, invoice_id, product_id, description, quantity, unit_price, amount, position) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        E::ITEMS_TABLE
    );
    for (offset, line) in items.iter().enumerate() {
        let item = InvoiceItem::from_line(invoice_id, line)?;
        sqlx::query(&insert_sql)
            .bind(item.id)
            .bind(item.invoice_id)
            .bind(item.product_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.amount)
            .bind(existing + offset as i64)
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;
    }

    let items_sql = format!("SELECT * FROM {} WHERE invoice_id = $1 ORDER BY position ASC", E::ITEMS_TABLE);
    let stored = sqlx::query_as::<_, InvoiceItem>(&items_sql)
        .bind(invoice_id)
        .fetch_all(&mut *conn)
        .await?;

    let total_sql = format!(
        "UPDATE {} SET total_amount = $2, updated_at = now() WHERE id = $1 RETURNING *",
        E::TABLE
    );
    let mut invoice = sqlx::query_as::<_, E>(&total_sql)
        .bind(invoice_id)
        .bind(compute_total(&stored))
        .fetch_one(&mut *conn)
        .await?;

    *invoice.items_mut() = stored;
    Ok(invoice)
}

#[async_trait]
impl<E: PgBillable> InvoiceRepository<E> for PgRepository<E> {
    async fn create_with_items(&self, company_id: Uuid, header: E::Create, items: Vec<LineItem>) -> Result<E, AppError> {
        check_line_items(&items)?;

        let mut tx = self.pool.begin().await?;
        let invoice = E::insert(&mut tx, Uuid::new_v4(), Some(company_id), header).await?;
        let invoice = write_items::<E>(&mut tx, invoice.id(), &items).await?;
        tx.commit().await?;

        tracing::debug!("{} {} criado com {} linhas", E::KIND, invoice.number(), items.len());
        Ok(invoice)
    }

    async fn insert_items(&self, invoice_id: Uuid, items: Vec<LineItem>) -> Result<E, AppError> {
        let mut tx = self.pool.begin().await?;
        fetch_one_for_update::<E>(&mut tx, invoice_id).await?;

        check_line_items(&items)?;
        let invoice = write_items::<E>(&mut tx, invoice_id, &items).await?;
        tx.commit().await?;
        Ok(invoice)
    }

    async fn replace_items(&self, invoice_id: Uuid, items: Vec<LineItem>) -> Result<E, AppError> {
        check_line_items(&items)?;

        let mut tx = self.pool.begin().await?;
        fetch_one_for_update::<E>(&mut tx, invoice_id).await?;

        let sql = format!("DELETE FROM {} WHERE invoice_id = $1", E::ITEMS_TABLE);
        sqlx::query(&sql).bind(invoice_id).execute(&mut *tx).await?;

        let invoice = write_items::<E>(&mut tx, invoice_id, &items).await?;
        tx.commit().await?;
        Ok(invoice)
    }
}
