// src/middleware/access.rs
//
// Portão de autorização no HTTP: cada handler declara a página que serve
// (`PageAccess<ClientsPage>`) e recebe o perfil e o recorte de empresa.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::Scope,
    middleware::{auth::CurrentSession, company::CompanyContext, i18n::Locale},
    models::{
        access::{Page, RouteDecision},
        auth::SessionView,
        profile::Profile,
    },
    services::access::{decide, resolve_scope, Identity},
};

/// 1. O Trait que define a página protegida
pub trait PageDef: Send + Sync + 'static {
    const PAGE: Page;
}

/// 2. O Extractor (Guardião)
pub struct PageAccess<P> {
    pub session: SessionView,
    // None = perfil sem empresa (só em páginas que não exigem uma)
    scope: Option<Scope>,
    _page: PhantomData<fn() -> P>,
}

impl<P> PageAccess<P> {
    pub fn profile(&self) -> &Profile {
        &self.session.profile
    }

    pub fn scope(&self) -> Result<Scope, AppError> {
        self.scope.ok_or(AppError::CompanyRequired)
    }

    pub fn scope_opt(&self) -> Option<Scope> {
        self.scope
    }
}

impl<P: PageDef> FromRequestParts<AppState> for PageAccess<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_parts(parts);
        let session = parts.extensions.get::<CurrentSession>().map(|current| current.0.clone());

        let identity = match &session {
            Some(session) => Identity::Authenticated(session.profile.clone()),
            None => Identity::Anonymous,
        };

        match decide(&identity, P::PAGE) {
            RouteDecision::Render => {}
            RouteDecision::Denied { message } => {
                return Err(ApiError::new(StatusCode::FORBIDDEN, message));
            }
            RouteDecision::Redirect { to: Page::SignIn } | RouteDecision::Loading => {
                return Err(AppError::InvalidToken.to_api_error(&locale, &state.i18n_store));
            }
            RouteDecision::Redirect { .. } => {
                return Err(AppError::Forbidden.to_api_error(&locale, &state.i18n_store));
            }
        }

        // Render sempre vem com sessão
        let session = session.ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &state.i18n_store))?;

        let requested = CompanyContext::from_parts(parts).map_err(|e| e.to_api_error(&locale, &state.i18n_store))?;
        let scope = resolve_scope(&session.profile, requested.0)
            .map_err(|e| e.to_api_error(&locale, &state.i18n_store))?;

        Ok(PageAccess { session, scope, _page: PhantomData })
    }
}

// ---
// DEFINIÇÃO DAS PÁGINAS (TIPOS)
// ---

pub struct HomePage;
impl PageDef for HomePage {
    const PAGE: Page = Page::Home;
}

pub struct ProfilePage;
impl PageDef for ProfilePage {
    const PAGE: Page = Page::Profile;
}

pub struct CompaniesPage;
impl PageDef for CompaniesPage {
    const PAGE: Page = Page::Companies;
}

pub struct TeamPage;
impl PageDef for TeamPage {
    const PAGE: Page = Page::Team;
}

pub struct ClientsPage;
impl PageDef for ClientsPage {
    const PAGE: Page = Page::Clients;
}

pub struct SuppliersPage;
impl PageDef for SuppliersPage {
    const PAGE: Page = Page::Suppliers;
}

pub struct InvoicesPage;
impl PageDef for InvoicesPage {
    const PAGE: Page = Page::Invoices;
}

pub struct SupplierInvoicesPage;
impl PageDef for SupplierInvoicesPage {
    const PAGE: Page = Page::SupplierInvoices;
}

pub struct ProductsPage;
impl PageDef for ProductsPage {
    const PAGE: Page = Page::Products;
}

pub struct InventoryPage;
impl PageDef for InventoryPage {
    const PAGE: Page = Page::Inventory;
}
