// src/handlers/invoices.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        access::{InvoicesPage, PageAccess, SupplierInvoicesPage},
        i18n::Locale,
    },
    models::invoice::{
        CreateInvoicePayload, CreateSupplierInvoicePayload, Invoice, SupplierInvoice, UpdateInvoicePayload,
        UpdateSupplierInvoicePayload,
    },
};

fn pdf_response(filename: &str, pdf_bytes: Vec<u8>) -> Response {
    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}.pdf\"", filename)),
    ];

    (headers, pdf_bytes).into_response()
}

// =============================================================================
//  ÁREA 1: FATURAS DE CLIENTE
// =============================================================================

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Faturas com suas linhas", body = Vec<Invoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoices = app_state
        .invoice_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoices))
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Invoices",
    request_body = CreateInvoicePayload,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 201, description = "Fatura criada, total calculado", body = Invoice),
        (status = 400, description = "Dados inválidos ou sem linhas"),
        (status = 404, description = "Cliente não encontrado na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .create(scope, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura", body = Invoice),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// PUT /api/invoices/{id}
#[utoipa::path(
    put,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = UpdateInvoicePayload,
    responses(
        (status = 200, description = "Fatura atualizada", body = Invoice),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .update(scope, id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// DELETE /api/invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura removida", body = Invoice),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .delete(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// GET /api/invoices/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/invoices/{id}/pdf",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF da fatura (com imposto)", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Não encontrada"),
        (status = 500, description = "Fonte ausente ou falha na geração")
    ),
    security(("api_jwt" = []))
)]
pub async fn invoice_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .invoice_pdf(&invoice)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(&invoice.number, pdf_bytes))
}

// =============================================================================
//  ÁREA 2: FATURAS DE FORNECEDOR
// =============================================================================

// GET /api/supplier-invoices
#[utoipa::path(
    get,
    path = "/api/supplier-invoices",
    tag = "Supplier invoices",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Faturas de fornecedor", body = Vec<SupplierInvoice>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_supplier_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SupplierInvoicesPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoices = app_state
        .supplier_invoice_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoices))
}

// POST /api/supplier-invoices
#[utoipa::path(
    post,
    path = "/api/supplier-invoices",
    tag = "Supplier invoices",
    request_body = CreateSupplierInvoicePayload,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 201, description = "Fatura de fornecedor criada", body = SupplierInvoice),
        (status = 400, description = "Dados inválidos ou sem linhas"),
        (status = 404, description = "Fornecedor não encontrado na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SupplierInvoicesPage>,
    Json(payload): Json<CreateSupplierInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .supplier_invoice_service
        .create(scope, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/supplier-invoices/{id}
#[utoipa::path(
    get,
    path = "/api/supplier-invoices/{id}",
    tag = "Supplier invoices",
    params(("id" = Uuid, Path, description = "ID da fatura de fornecedor")),
    responses(
        (status = 200, description = "Fatura de fornecedor", body = SupplierInvoice),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_supplier_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SupplierInvoicesPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .supplier_invoice_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// PUT /api/supplier-invoices/{id}
#[utoipa::path(
    put,
    path = "/api/supplier-invoices/{id}",
    tag = "Supplier invoices",
    params(("id" = Uuid, Path, description = "ID da fatura de fornecedor")),
    request_body = UpdateSupplierInvoicePayload,
    responses(
        (status = 200, description = "Fatura de fornecedor atualizada", body = SupplierInvoice),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_supplier_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SupplierInvoicesPage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .supplier_invoice_service
        .update(scope, id, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// DELETE /api/supplier-invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/supplier-invoices/{id}",
    tag = "Supplier invoices",
    params(("id" = Uuid, Path, description = "ID da fatura de fornecedor")),
    responses(
        (status = 200, description = "Fatura de fornecedor removida", body = SupplierInvoice),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_supplier_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SupplierInvoicesPage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .supplier_invoice_service
        .delete(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// GET /api/supplier-invoices/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/supplier-invoices/{id}/pdf",
    tag = "Supplier invoices",
    params(("id" = Uuid, Path, description = "ID da fatura de fornecedor")),
    responses(
        (status = 200, description = "PDF da fatura de fornecedor", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Não encontrada"),
        (status = 500, description = "Fonte ausente ou falha na geração")
    ),
    security(("api_jwt" = []))
)]
pub async fn supplier_invoice_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<SupplierInvoicesPage>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .supplier_invoice_service
        .get(scope, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .supplier_invoice_pdf(&invoice)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(pdf_response(&invoice.number, pdf_bytes))
}
