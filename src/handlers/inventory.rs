// src/handlers/inventory.rs

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
        access::{InventoryPage, PageAccess, ProductsPage},
        i18n::Locale,
    },
    models::inventory::{ExpectedInventoryEntry, InventoryEntry, NewProduct, Product, ProductUpdate},
};

// --- PRODUTOS ---

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Inventory",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Catálogo de produtos", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ProductsPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let products = app_state
        .product_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Inventory",
    request_body = NewProduct,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ProductsPage>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .create(scope, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ProductsPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ProductsPage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update(scope, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido", body = Product),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<ProductsPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .delete(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

// --- ESTOQUE ---

// GET /api/inventory
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Saldo e nível de estoque por produto", body = Vec<InventoryEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InventoryPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let entries = app_state
        .inventory_service
        .get_inventory(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entries))
}

// GET /api/inventory/expected
#[utoipa::path(
    get,
    path = "/api/inventory/expected",
    tag = "Inventory",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Saldo + entradas previstas", body = Vec<ExpectedInventoryEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_expected_inventory(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InventoryPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let entries = app_state
        .inventory_service
        .get_expected_inventory(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entries))
}
