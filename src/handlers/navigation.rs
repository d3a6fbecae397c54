// src/handlers/navigation.rs
//
// O menu do dashboard: a decisão do portão para cada página, para quem está chamando.

use axum::{extract::Path, response::IntoResponse, Json};

use crate::{
    middleware::auth::MaybeSession,
    models::access::{NavigationEntry, Page},
    services::access::{decide, navigation, Identity},
};

fn identity_of(session: MaybeSession) -> Identity {
    match session.0 {
        Some(session) => Identity::Authenticated(session.profile),
        None => Identity::Anonymous,
    }
}

// GET /api/navigation
#[utoipa::path(
    get,
    path = "/api/navigation",
    tag = "Navigation",
    responses(
        (status = 200, description = "Decisão para todas as páginas", body = Vec<NavigationEntry>)
    ),
    security((), ("api_jwt" = []))
)]
pub async fn list_navigation(session: MaybeSession) -> impl IntoResponse {
    Json(navigation(&identity_of(session)))
}

// GET /api/navigation/{page}
#[utoipa::path(
    get,
    path = "/api/navigation/{page}",
    tag = "Navigation",
    params(
        ("page" = Page, Path, description = "Página do dashboard (ex.: supplier_invoices)")
    ),
    responses(
        (status = 200, description = "Decisão para a página", body = NavigationEntry)
    ),
    security((), ("api_jwt" = []))
)]
pub async fn get_navigation(session: MaybeSession, Path(page): Path<Page>) -> impl IntoResponse {
    let decision = decide(&identity_of(session), page);
    Json(NavigationEntry { page, decision })
}
