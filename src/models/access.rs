// src/models/access.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Páginas do dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    SignIn,
    Home,
    Profile,
    Companies,
    Team,
    Clients,
    Suppliers,
    Invoices,
    SupplierInvoices,
    Products,
    Inventory,
}

impl Page {
    pub const ALL: [Page; 11] = [
        Page::SignIn,
        Page::Home,
        Page::Profile,
        Page::Companies,
        Page::Team,
        Page::Clients,
        Page::Suppliers,
        Page::Invoices,
        Page::SupplierInvoices,
        Page::Products,
        Page::Inventory,
    ];

    pub fn rule(self) -> PageRule {
        match self {
            Page::SignIn => PageRule::AnonymousOnly,
            Page::Home | Page::Profile => PageRule::Authenticated,
            Page::Companies => PageRule::SuperAdminOnly,
            Page::Team
            | Page::Clients
            | Page::Suppliers
            | Page::Invoices
            | Page::SupplierInvoices
            | Page::Products
            | Page::Inventory => PageRule::CompanyScoped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRule {
    AnonymousOnly,
    Authenticated,
    SuperAdminOnly,
    CompanyScoped,
}

// O que cada cargo pode fazer (tabela de políticas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageCompanies,
    AccessCompanyData,
    BypassCompanyScope,
    ManageTeam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteDecision {
    Loading,
    Redirect { to: Page },
    Render,
    Denied { message: String },
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    pub page: Page,
    pub decision: RouteDecision,
}
