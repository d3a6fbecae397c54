// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{ClientsPage, PageAccess, SuppliersPage},
        i18n::Locale,
    },
    models::crm::{Client, ClientUpdate, NewClient, NewSupplier, Supplier, SupplierUpdate},
};

// =============================================================================
//  ÁREA 1: CLIENTES
// =============================================================================

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "CRM",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Clientes da empresa", body = Vec<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ClientsPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let clients = app_state
        .client_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(clients))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "CRM",
    request_body = NewClient,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ClientsPage>,
    Json(payload): Json<NewClient>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .client_service
        .create(scope, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ClientsPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .client_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(client))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ClientUpdate,
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ClientsPage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .client_service
        .update(scope, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(client))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido", body = Client),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ClientsPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .client_service
        .delete(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(client))
}

// =============================================================================
//  ÁREA 2: FORNECEDORES
// =============================================================================

// GET /api/suppliers
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "CRM",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Fornecedores da empresa", body = Vec<Supplier>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SuppliersPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let suppliers = app_state
        .supplier_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(suppliers))
}

// POST /api/suppliers
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "CRM",
    request_body = NewSupplier,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SuppliersPage>,
    Json(payload): Json<NewSupplier>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .create(scope, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

// GET /api/suppliers/{id}
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor", body = Supplier),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SuppliersPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(supplier))
}

// PUT /api/suppliers/{id}
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    request_body = SupplierUpdate,
    responses(
        (status = 200, description = "Fornecedor atualizado", body = Supplier),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SuppliersPage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SupplierUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .update(scope, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(supplier))
}

// DELETE /api/suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor removido", body = Supplier),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SuppliersPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .delete(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(supplier))
}
