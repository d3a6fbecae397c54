// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid; // Importante para o Swagger params

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        access::{HomePage, PageAccess},
        i18n::Locale,
    },
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contagens e totais da empresa", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<HomePage>,
) -> Result<impl IntoResponse, ApiError> {
    // Perfil sem empresa: painel zerado
    let Some(scope) = access.scope_opt() else {
        return Ok((StatusCode::OK, Json(DashboardSummary::default())));
    };

    let summary = app_state
        .dashboard_service
        .summary(scope)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Servidor no ar", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}
