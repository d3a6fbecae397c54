// src/handlers/line_items.rs
//
// Editor de linhas do formulário de fatura. Nada é gravado: recebe a lista,
// aplica a alteração e devolve a lista nova com o total.

use std::{borrow::Cow, collections::BTreeMap};

use axum::{extract::State, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{magnitude_within, MAX_PRICE, MAX_QUANTITY},
    },
    config::AppState,
    middleware::{
        access::{InvoicesPage, PageAccess},
        i18n::Locale,
    },
    models::invoice::LineItem,
    services::line_items::{
        add_line_item, compute_total, recompute_amounts, remove_line_item, update_line_item, LineItemEdit,
    },
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LineItemAction {
    Add,
    Update { index: usize, edit: LineItemEdit },
    Remove { index: usize },
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditLineItemsPayload {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[schema(example = json!({ "action": "update", "index": 0, "edit": { "field": "quantity", "value": 3 } }))]
    pub change: LineItemAction,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditLineItemsResponse {
    pub items: Vec<LineItem>,
    #[schema(example = "75.00")]
    pub total: Decimal,
}

// Negativos passam; só o tamanho é limitado
fn check_bounds(items: &[LineItem], change: &LineItemAction) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    let mut lines = BTreeMap::new();
    for (index, item) in items.iter().enumerate() {
        let mut line = ValidationErrors::new();
        if let Err(e) = magnitude_within(&item.quantity, MAX_QUANTITY, "max_quantity") {
            line.add("quantity", e);
        }
        if let Err(e) = magnitude_within(&item.unit_price, MAX_PRICE, "max_price") {
            line.add("unit_price", e);
        }
        if !line.is_empty() {
            lines.insert(index, Box::new(line));
        }
    }
    if !lines.is_empty() {
        errors.errors_mut().insert(Cow::Borrowed("items"), ValidationErrorsKind::List(lines));
    }

    if let LineItemAction::Update { edit, .. } = change {
        let checked = match edit {
            LineItemEdit::Quantity(value) => magnitude_within(value, MAX_QUANTITY, "max_quantity"),
            LineItemEdit::UnitPrice(value) => magnitude_within(value, MAX_PRICE, "max_price"),
            LineItemEdit::Product(_) | LineItemEdit::Description(_) => Ok(()),
        };
        if let Err(e) = checked {
            errors.add("change", e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

// POST /api/line-items/edit
#[utoipa::path(
    post,
    path = "/api/line-items/edit",
    tag = "Invoices",
    request_body = EditLineItemsPayload,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Linhas após a alteração e o total", body = EditLineItemsResponse),
        (status = 400, description = "Quantidade ou preço acima do limite")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_line_items(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<InvoicesPage>,
    Json(payload): Json<EditLineItemsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    check_bounds(&payload.items, &payload.change).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // O `amount` enviado não vale: recalcula antes de editar
    let mut current = payload.items;
    recompute_amounts(&mut current).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let items = match payload.change {
        LineItemAction::Add => add_line_item(&current),
        LineItemAction::Remove { index } => remove_line_item(&current, index),
        LineItemAction::Update { index, edit } => {
            // Só a troca de produto consulta o catálogo
            let products = match (&edit, access.scope_opt()) {
                (LineItemEdit::Product(_), Some(scope)) => app_state
                    .product_service
                    .list(scope)
                    .await
                    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?,
                _ => Vec::new(),
            };
            update_line_item(&current, index, edit, &products)
        }
    };

    let total = compute_total(&items);
    Ok(Json(EditLineItemsResponse { items, total }))
}
