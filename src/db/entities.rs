// src/db/entities.rs
//
// Como cada modelo nasce (create) e recebe patches (update).
// Campos `None` no patch ficam como estão.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{Billable, Entity},
    models::{
        company::{Company, CompanyUpdate, NewCompany},
        crm::{Client, ClientUpdate, NewClient, NewSupplier, Supplier, SupplierUpdate},
        inventory::{NewProduct, Product, ProductUpdate},
        invoice::{
            Invoice, InvoiceHeader, InvoiceHeaderPatch, InvoiceItem, InvoiceStatus, SupplierInvoice,
            SupplierInvoiceStatus,
        },
        profile::{NewProfile, Profile, ProfileUpdate},
    },
};

fn patch<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn patch_opt<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

impl Entity for Company {
    type Create = NewCompany;
    type Update = CompanyUpdate;
    const KIND: &'static str = "company";

    fn id(&self) -> Uuid {
        self.id
    }

    // A empresa é o próprio recorte
    fn company_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn build(id: Uuid, _company_id: Option<Uuid>, input: NewCompany, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id,
            name: input.name,
            subscription_status: input.subscription_status,
            email: input.email,
            phone: input.phone,
            address: input.address,
            tax_id: input.tax_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: CompanyUpdate, now: DateTime<Utc>) {
        patch(&mut self.name, input.name);
        patch(&mut self.subscription_status, input.subscription_status);
        patch_opt(&mut self.email, input.email);
        patch_opt(&mut self.phone, input.phone);
        patch_opt(&mut self.address, input.address);
        patch_opt(&mut self.tax_id, input.tax_id);
        self.updated_at = now;
    }
}

impl Entity for Profile {
    type Create = NewProfile;
    type Update = ProfileUpdate;
    const KIND: &'static str = "profile";

    fn id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Option<Uuid> {
        self.company_id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.username.clone())
    }

    // O id do perfil é o id da conta
    fn build(_id: Uuid, company_id: Option<Uuid>, input: NewProfile, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id: input.user_id,
            username: input.username,
            full_name: input.full_name,
            company_id,
            role: input.role,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: ProfileUpdate, now: DateTime<Utc>) {
        patch(&mut self.username, input.username);
        patch(&mut self.full_name, input.full_name);
        patch(&mut self.role, input.role);
        patch(&mut self.company_id, input.company_id);
        self.updated_at = now;
    }
}

impl Entity for Client {
    type Create = NewClient;
    type Update = ClientUpdate;
    const KIND: &'static str = "client";

    fn id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Option<Uuid> {
        Some(self.company_id)
    }

    fn build(id: Uuid, company_id: Option<Uuid>, input: NewClient, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id,
            company_id: company_id.ok_or(AppError::CompanyRequired)?,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            created_at: now,
        })
    }

    fn apply(&mut self, input: ClientUpdate, _now: DateTime<Utc>) {
        patch(&mut self.name, input.name);
        patch_opt(&mut self.email, input.email);
        patch_opt(&mut self.phone, input.phone);
        patch_opt(&mut self.address, input.address);
    }
}

impl Entity for Supplier {
    type Create = NewSupplier;
    type Update = SupplierUpdate;
    const KIND: &'static str = "supplier";

    fn id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Option<Uuid> {
        Some(self.company_id)
    }

    fn build(id: Uuid, company_id: Option<Uuid>, input: NewSupplier, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id,
            company_id: company_id.ok_or(AppError::CompanyRequired)?,
            name: input.name,
            contact_person: input.contact_person,
            email: input.email,
            phone: input.phone,
            address: input.address,
            status: input.status,
            created_at: now,
        })
    }

    fn apply(&mut self, input: SupplierUpdate, _now: DateTime<Utc>) {
        patch(&mut self.name, input.name);
        patch_opt(&mut self.contact_person, input.contact_person);
        patch_opt(&mut self.email, input.email);
        patch_opt(&mut self.phone, input.phone);
        patch_opt(&mut self.address, input.address);
        patch(&mut self.status, input.status);
    }
}

impl Entity for Product {
    type Create = NewProduct;
    type Update = ProductUpdate;
    const KIND: &'static str = "product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Option<Uuid> {
        Some(self.company_id)
    }

    fn build(id: Uuid, company_id: Option<Uuid>, input: NewProduct, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id,
            company_id: company_id.ok_or(AppError::CompanyRequired)?,
            name: input.name,
            category: input.category,
            price: input.price,
            stock: input.stock,
            status: input.status,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: ProductUpdate, now: DateTime<Utc>) {
        patch(&mut self.name, input.name);
        patch(&mut self.category, input.category);
        patch(&mut self.price, input.price);
        patch(&mut self.stock, input.stock);
        patch(&mut self.status, input.status);
        self.updated_at = now;
    }
}

// --- Faturas ---

impl Entity for Invoice {
    type Create = InvoiceHeader<InvoiceStatus>;
    type Update = InvoiceHeaderPatch<InvoiceStatus>;
    const KIND: &'static str = "invoice";

    fn id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Option<Uuid> {
        Some(self.company_id)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.number.clone())
    }

    fn build(id: Uuid, company_id: Option<Uuid>, input: Self::Create, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id,
            company_id: company_id.ok_or(AppError::CompanyRequired)?,
            number: input.number,
            client_id: input.party_id,
            date: input.date,
            due_date: input.due_date,
            total_amount: Decimal::ZERO,
            status: input.status,
            notes: input.notes,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: Self::Update, now: DateTime<Utc>) {
        patch(&mut self.client_id, input.party_id);
        patch(&mut self.date, input.date);
        patch(&mut self.due_date, input.due_date);
        patch(&mut self.status, input.status);
        patch_opt(&mut self.notes, input.notes);
        self.updated_at = now;
    }
}

impl Billable for Invoice {
    type Status = InvoiceStatus;
    type Party = Client;
    const NUMBER_PREFIX: &'static str = "INV-";

    fn number(&self) -> &str {
        &self.number
    }

    fn party_id(&self) -> Uuid {
        self.client_id
    }

    fn status(&self) -> InvoiceStatus {
        self.status
    }

    fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<InvoiceItem> {
        &mut self.items
    }

    fn set_total(&mut self, total: Decimal) {
        self.total_amount = total;
    }

    fn header(header: InvoiceHeader<InvoiceStatus>) -> Self::Create {
        header
    }

    fn patch(patch: InvoiceHeaderPatch<InvoiceStatus>) -> Self::Update {
        patch
    }
}

impl Entity for SupplierInvoice {
    type Create = InvoiceHeader<SupplierInvoiceStatus>;
    type Update = InvoiceHeaderPatch<SupplierInvoiceStatus>;
    const KIND: &'static str = "supplier_invoice";

    fn id(&self) -> Uuid {
        self.id
    }

    fn company_id(&self) -> Option<Uuid> {
        Some(self.company_id)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.number.clone())
    }

    fn build(id: Uuid, company_id: Option<Uuid>, input: Self::Create, now: DateTime<Utc>) -> Result<Self, AppError> {
        Ok(Self {
            id,
            company_id: company_id.ok_or(AppError::CompanyRequired)?,
            number: input.number,
            supplier_id: input.party_id,
            date: input.date,
            due_date: input.due_date,
            total_amount: Decimal::ZERO,
            status: input.status,
            notes: input.notes,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: Self::Update, now: DateTime<Utc>) {
        patch(&mut self.supplier_id, input.party_id);
        patch(&mut self.date, input.date);
        patch(&mut self.due_date, input.due_date);
        patch(&mut self.status, input.status);
        patch_opt(&mut self.notes, input.notes);
        self.updated_at = now;
    }
}

impl Billable for SupplierInvoice {
    type Status = SupplierInvoiceStatus;
    type Party = Supplier;
    const NUMBER_PREFIX: &'static str = "SINV-";

    fn number(&self) -> &str {
        &self.number
    }

    fn party_id(&self) -> Uuid {
        self.supplier_id
    }

    fn status(&self) -> SupplierInvoiceStatus {
        self.status
    }

    fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<InvoiceItem> {
        &mut self.items
    }

    fn set_total(&mut self, total: Decimal) {
        self.total_amount = total;
    }

    fn header(header: InvoiceHeader<SupplierInvoiceStatus>) -> Self::Create {
        header
    }

    fn patch(patch: InvoiceHeaderPatch<SupplierInvoiceStatus>) -> Self::Update {
        patch
    }
}
