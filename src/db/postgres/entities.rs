// src/db/postgres/entities.rs
//
// SQL de cada tabela. Patches usam COALESCE: parâmetro NULL mantém a coluna.

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::postgres::{load_items, map_db_error, PgBillable, PgEntity},
    models::{
        company::{Company, CompanyUpdate, NewCompany},
        crm::{Client, ClientUpdate, NewClient, NewSupplier, Supplier, SupplierUpdate},
        inventory::{NewProduct, Product, ProductUpdate},
        invoice::{Invoice, InvoiceHeader, InvoiceHeaderPatch, InvoiceStatus, SupplierInvoice, SupplierInvoiceStatus},
        profile::{NewProfile, Profile, ProfileUpdate},
    },
};

// =========================================================================
//  EMPRESAS
// =========================================================================

#[async_trait]
impl PgEntity for Company {
    const TABLE: &'static str = "companies";
    const SCOPE_COLUMN: &'static str = "id";

    async fn insert(conn: &mut PgConnection, id: Uuid, _company_id: Option<Uuid>, input: NewCompany) -> Result<Self, AppError> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, name, subscription_status, email, phone, address, tax_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.subscription_status)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .bind(input.tax_id)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(conn: &mut PgConnection, id: Uuid, input: CompanyUpdate) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                subscription_status = COALESCE($3, subscription_status),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                tax_id = COALESCE($7, tax_id),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.subscription_status)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .bind(input.tax_id)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }
}

// =========================================================================
//  PERFIS
// =========================================================================

#[async_trait]
impl PgEntity for Profile {
    const TABLE: &'static str = "profiles";

    async fn insert(conn: &mut PgConnection, _id: Uuid, company_id: Option<Uuid>, input: NewProfile) -> Result<Self, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, username, full_name, company_id, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.username)
        .bind(input.full_name)
        .bind(company_id)
        .bind(input.role)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(conn: &mut PgConnection, id: Uuid, input: ProfileUpdate) -> Result<Option<Self>, AppError> {
        // $5 diz se company_id deve ser trocado (inclusive por NULL)
        let (set_company, company_id) = match input.company_id {
            Some(company_id) => (true, company_id),
            None => (false, None),
        };

        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                username = COALESCE($2, username),
                full_name = COALESCE($3, full_name),
                role = COALESCE($4, role),
                company_id = CASE WHEN $5 THEN $6 ELSE company_id END,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.username)
        .bind(input.full_name)
        .bind(input.role)
        .bind(set_company)
        .bind(company_id)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }
}

// =========================================================================
//  CLIENTES E FORNECEDORES
// =========================================================================

#[async_trait]
impl PgEntity for Client {
    const TABLE: &'static str = "clients";

    async fn insert(conn: &mut PgConnection, id: Uuid, company_id: Option<Uuid>, input: NewClient) -> Result<Self, AppError> {
        let company_id = company_id.ok_or(AppError::CompanyRequired)?;

        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, company_id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(input.name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(conn: &mut PgConnection, id: Uuid, input: ClientUpdate) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl PgEntity for Supplier {
    const TABLE: &'static str = "suppliers";

    async fn insert(conn: &mut PgConnection, id: Uuid, company_id: Option<Uuid>, input: NewSupplier) -> Result<Self, AppError> {
        let company_id = company_id.ok_or(AppError::CompanyRequired)?;

        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (id, company_id, name, contact_person, email, phone, address, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(input.name)
        .bind(input.contact_person)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .bind(input.status)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(conn: &mut PgConnection, id: Uuid, input: SupplierUpdate) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET
                name = COALESCE($2, name),
                contact_person = COALESCE($3, contact_person),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                status = COALESCE($7, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.contact_person)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.address)
        .bind(input.status)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }
}

// =========================================================================
//  PRODUTOS
// =========================================================================

#[async_trait]
impl PgEntity for Product {
    const TABLE: &'static str = "products";

    async fn insert(conn: &mut PgConnection, id: Uuid, company_id: Option<Uuid>, input: NewProduct) -> Result<Self, AppError> {
        let company_id = company_id.ok_or(AppError::CompanyRequired)?;

        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, company_id, name, category, price, stock, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(input.name)
        .bind(input.category)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.status)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(conn: &mut PgConnection, id: Uuid, input: ProductUpdate) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                status = COALESCE($6, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.category)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.status)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }
}

// =========================================================================
//  FATURAS
// =========================================================================

#[async_trait]
impl PgEntity for Invoice {
    const TABLE: &'static str = "invoices";

    async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Option<Uuid>,
        input: InvoiceHeader<InvoiceStatus>,
    ) -> Result<Self, AppError> {
        let company_id = company_id.ok_or(AppError::CompanyRequired)?;

        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (id, company_id, number, client_id, date, due_date, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(input.number)
        .bind(input.party_id)
        .bind(input.date)
        .bind(input.due_date)
        .bind(input.status)
        .bind(input.notes)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        input: InvoiceHeaderPatch<InvoiceStatus>,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices SET
                client_id = COALESCE($2, client_id),
                date = COALESCE($3, date),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.party_id)
        .bind(input.date)
        .bind(input.due_date)
        .bind(input.status)
        .bind(input.notes)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }

    async fn load_children(conn: &mut PgConnection, rows: &mut [Self]) -> Result<(), AppError> {
        load_items(conn, rows).await
    }
}

impl PgBillable for Invoice {
    const ITEMS_TABLE: &'static str = "invoice_items";
}

#[async_trait]
impl PgEntity for SupplierInvoice {
    const TABLE: &'static str = "supplier_invoices";

    async fn insert(
        conn: &mut PgConnection,
        id: Uuid,
        company_id: Option<Uuid>,
        input: InvoiceHeader<SupplierInvoiceStatus>,
    ) -> Result<Self, AppError> {
        let company_id = company_id.ok_or(AppError::CompanyRequired)?;

        sqlx::query_as::<_, SupplierInvoice>(
            r#"
            INSERT INTO supplier_invoices (id, company_id, number, supplier_id, date, due_date, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(input.number)
        .bind(input.party_id)
        .bind(input.date)
        .bind(input.due_date)
        .bind(input.status)
        .bind(input.notes)
        .fetch_one(conn)
        .await
        .map_err(map_db_error)
    }

    async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        input: InvoiceHeaderPatch<SupplierInvoiceStatus>,
    ) -> Result<Option<Self>, AppError> {
        sqlx::query_as::<_, SupplierInvoice>(
            r#"
            UPDATE supplier_invoices SET
                supplier_id = COALESCE($2, supplier_id),
                date = COALESCE($3, date),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.party_id)
        .bind(input.date)
        .bind(input.due_date)
        .bind(input.status)
        .bind(input.notes)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
    }

    async fn load_children(conn: &mut PgConnection, rows: &mut [Self]) -> Result<(), AppError> {
        load_items(conn, rows).await
    }
}

impl PgBillable for SupplierInvoice {
    const ITEMS_TABLE: &'static str = "supplier_invoice_items";
}
