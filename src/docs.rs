// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::dashboard::health,

        // --- Auth ---
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::sign_out,
        handlers::auth::get_session,

        // --- Profile ---
        handlers::profile::get_profile,
        handlers::profile::update_profile,

        // --- Navigation ---
        handlers::navigation::list_navigation,
        handlers::navigation::get_navigation,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,

        // --- Team ---
        handlers::team::list_team,
        handlers::team::add_member,
        handlers::team::change_role,
        handlers::team::remove_member,

        // --- CRM ---
        handlers::crm::list_clients,
        handlers::crm::create_client,
        handlers::crm::get_client,
        handlers::crm::update_client,
        handlers::crm::delete_client,
        handlers::crm::list_suppliers,
        handlers::crm::create_supplier,
        handlers::crm::get_supplier,
        handlers::crm::update_supplier,
        handlers::crm::delete_supplier,

        // --- INVENTORY ---
        handlers::inventory::list_products,
        handlers::inventory::create_product,
        handlers::inventory::get_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,
        handlers::inventory::get_inventory,
        handlers::inventory::get_expected_inventory,

        // --- INVOICES ---
        handlers::invoices::list_invoices,
        handlers::invoices::create_invoice,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
        handlers::invoices::invoice_pdf,
        handlers::invoices::list_supplier_invoices,
        handlers::invoices::create_supplier_invoice,
        handlers::invoices::get_supplier_invoice,
        handlers::invoices::update_supplier_invoice,
        handlers::invoices::delete_supplier_invoice,
        handlers::invoices::supplier_invoice_pdf,
        handlers::line_items::edit_line_items,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserAccount,
            models::auth::SignUpPayload,
            models::auth::SignInPayload,
            models::auth::SessionView,
            models::auth::SessionResponse,
            models::auth::AuthResponse,

            // --- Perfis e acesso ---
            models::profile::Role,
            models::profile::Profile,
            models::profile::UpdateProfilePayload,
            models::profile::AddTeamMemberPayload,
            models::profile::ChangeRolePayload,
            models::access::Page,
            models::access::Capability,
            models::access::RouteDecision,
            models::access::NavigationEntry,

            // --- Empresas ---
            models::company::SubscriptionStatus,
            models::company::Company,
            models::company::NewCompany,
            models::company::CompanyUpdate,

            // --- CRM ---
            models::crm::Client,
            models::crm::NewClient,
            models::crm::ClientUpdate,
            models::crm::SupplierStatus,
            models::crm::Supplier,
            models::crm::NewSupplier,
            models::crm::SupplierUpdate,

            // --- Inventory ---
            models::inventory::ProductStatus,
            models::inventory::Product,
            models::inventory::NewProduct,
            models::inventory::ProductUpdate,
            models::inventory::StockLevel,
            models::inventory::InventoryEntry,
            models::inventory::ExpectedInventoryEntry,

            // --- Invoices ---
            models::invoice::InvoiceStatus,
            models::invoice::SupplierInvoiceStatus,
            models::invoice::InvoiceItem,
            models::invoice::LineItem,
            models::invoice::Invoice,
            models::invoice::SupplierInvoice,
            models::invoice::CreateInvoicePayload,
            models::invoice::UpdateInvoicePayload,
            models::invoice::CreateSupplierInvoicePayload,
            models::invoice::UpdateSupplierInvoicePayload,
            models::invoice::TaxBreakdown,
            services::line_items::LineItemEdit,
            handlers::line_items::LineItemAction,
            handlers::line_items::EditLineItemsPayload,
            handlers::line_items::EditLineItemsResponse,

            // --- DASHBOARD ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Health", description = "Estado do servidor"),
        (name = "Auth", description = "Cadastro, login e sessão"),
        (name = "Profile", description = "Perfil do usuário logado"),
        (name = "Navigation", description = "Decisões do portão de páginas"),
        (name = "Companies", description = "Empresas (só super_admin)"),
        (name = "Team", description = "Equipe e cargos"),
        (name = "CRM", description = "Clientes e fornecedores"),
        (name = "Inventory", description = "Produtos e estoque"),
        (name = "Invoices", description = "Faturas de cliente e editor de linhas"),
        (name = "Supplier invoices", description = "Faturas de fornecedor"),
        (name = "Dashboard", description = "Indicadores da empresa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}
