// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{auth_guard, optional_session},
};

pub fn app(app_state: AppState) -> Router {
    // Rotas públicas (sem sessão)
    let auth_routes = Router::new()
        .route("/api/auth/sign-up", post(handlers::auth::sign_up))
        .route("/api/auth/sign-in", post(handlers::auth::sign_in));

    // Rotas públicas que enxergam a sessão, se houver
    let session_routes = Router::new()
        .route("/api/auth/session", get(handlers::auth::get_session))
        .route("/api/navigation", get(handlers::navigation::list_navigation))
        .route("/api/navigation/{page}", get(handlers::navigation::get_navigation))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), optional_session));

    let company_routes = Router::new()
        .route(
            "/",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/{id}",
            get(handlers::companies::get_company)
                .put(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        );

    let team_routes = Router::new()
        .route("/", get(handlers::team::list_team).post(handlers::team::add_member))
        .route("/{profile_id}/role", patch(handlers::team::change_role))
        .route("/{profile_id}", axum::routing::delete(handlers::team::remove_member));

    let client_routes = Router::new()
        .route("/", get(handlers::crm::list_clients).post(handlers::crm::create_client))
        .route(
            "/{id}",
            get(handlers::crm::get_client)
                .put(handlers::crm::update_client)
                .delete(handlers::crm::delete_client),
        );

    let supplier_routes = Router::new()
        .route("/", get(handlers::crm::list_suppliers).post(handlers::crm::create_supplier))
        .route(
            "/{id}",
            get(handlers::crm::get_supplier)
                .put(handlers::crm::update_supplier)
                .delete(handlers::crm::delete_supplier),
        );

    let product_routes = Router::new()
        .route("/", get(handlers::inventory::list_products).post(handlers::inventory::create_product))
        .route(
            "/{id}",
            get(handlers::inventory::get_product)
                .put(handlers::inventory::update_product)
                .delete(handlers::inventory::delete_product),
        );

    let inventory_routes = Router::new()
        .route("/", get(handlers::inventory::get_inventory))
        .route("/expected", get(handlers::inventory::get_expected_inventory));

    let invoice_routes = Router::new()
        .route("/", get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice))
        .route(
            "/{id}",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route("/{id}/pdf", get(handlers::invoices::invoice_pdf));

    let supplier_invoice_routes = Router::new()
        .route(
            "/",
            get(handlers::invoices::list_supplier_invoices).post(handlers::invoices::create_supplier_invoice),
        )
        .route(
            "/{id}",
            get(handlers::invoices::get_supplier_invoice)
                .put(handlers::invoices::update_supplier_invoice)
                .delete(handlers::invoices::delete_supplier_invoice),
        )
        .route("/{id}/pdf", get(handlers::invoices::supplier_invoice_pdf));

    // Tudo aqui exige token válido; o portão de páginas roda em cada handler
    let protected_routes = Router::new()
        .route("/api/auth/sign-out", post(handlers::auth::sign_out))
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/api/line-items/edit", post(handlers::line_items::edit_line_items))
        .nest("/api/companies", company_routes)
        .nest("/api/team", team_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/suppliers", supplier_routes)
        .nest("/api/products", product_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/invoices", invoice_routes)
        .nest("/api/supplier-invoices", supplier_invoice_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::dashboard::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(auth_routes)
        .merge(session_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
