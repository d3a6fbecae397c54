// tests/access_api.rs
//
// Portão de páginas e recorte por empresa, de ponta a ponta.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use backoffice::services::access::{COMPANIES_DENIED, NO_COMPANY_DENIED};
use common::{spawn, Call};

fn decision_for<'a>(entries: &'a Value, page: &str) -> &'a Value {
    entries
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["page"] == page)
        .map(|entry| &entry["decision"])
        .unwrap()
}

#[tokio::test]
async fn anonymous_navigation_points_to_sign_in() {
    let app = spawn().await;
    let (status, entries) = app.call(Call::new(Method::GET, "/api/navigation")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries.as_array().unwrap().len(), 11);
    assert_eq!(decision_for(&entries, "sign_in"), &json!({ "outcome": "render" }));
    assert_eq!(decision_for(&entries, "invoices"), &json!({ "outcome": "redirect", "to": "sign_in" }));
}

#[tokio::test]
async fn navigation_for_one_page() {
    let app = spawn().await;
    let token = app.sign_up("joao", None).await;

    let (status, entry) = app.get("/api/navigation/supplier_invoices", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["page"], "supplier_invoices");
    assert_eq!(entry["decision"], json!({ "outcome": "denied", "message": NO_COMPANY_DENIED }));

    let (_, entry) = app.get("/api/navigation/sign_in", &token).await;
    assert_eq!(entry["decision"], json!({ "outcome": "redirect", "to": "home" }));
}

#[tokio::test]
async fn staff_without_company_is_denied_but_keeps_home() {
    let app = spawn().await;
    let token = app.sign_up("joao", None).await;

    let (status, body) = app.get("/api/clients", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], NO_COMPANY_DENIED);

    let (status, summary) = app.get("/api/dashboard/summary", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["clients"], 0);
    assert_eq!(summary["invoices"], 0);
}

#[tokio::test]
async fn only_super_admin_manages_companies() {
    let app = spawn().await;
    let admin = app.sign_up("maria", Some("Loja")).await;

    let (status, body) = app.get("/api/companies", &admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], COMPANIES_DENIED);

    let root = app.super_admin().await;
    let (status, company) = app.post("/api/companies", &root, json!({ "name": "Mercado Novo" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(company["subscriptionStatus"], "trial");

    let (_, companies) = app.get("/api/companies", &root).await;
    assert_eq!(companies.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn companies_do_not_see_each_other() {
    let app = spawn().await;
    let maria = app.sign_up("maria", Some("Loja da Maria")).await;
    let joao = app.sign_up("joao", Some("Loja do Joao")).await;
    let maria_company = app.company_of(&maria).await;

    let (status, _) = app.post("/api/clients", &maria, json!({ "name": "Padaria" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, clients) = app.get("/api/clients", &joao).await;
    assert!(clients.as_array().unwrap().is_empty());

    // Pedir a empresa de outro é recusado
    let (status, _) = app
        .call(Call::new(Method::GET, "/api/clients").token(&joao).company(&maria_company))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_picks_a_company_with_the_header() {
    let app = spawn().await;
    let maria = app.sign_up("maria", Some("Loja da Maria")).await;
    let joao = app.sign_up("joao", Some("Loja do Joao")).await;
    let maria_company = app.company_of(&maria).await;
    app.post("/api/clients", &maria, json!({ "name": "Padaria" })).await;
    app.post("/api/clients", &joao, json!({ "name": "Mercearia" })).await;

    let root = app.super_admin().await;

    // Sem cabeçalho: todas as empresas
    let (_, all) = app.get("/api/clients", &root).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, scoped) = app
        .call(Call::new(Method::GET, "/api/clients").token(&root).company(&maria_company))
        .await;
    assert_eq!(scoped.as_array().unwrap().len(), 1);
    assert_eq!(scoped[0]["name"], "Padaria");

    // Gravar exige empresa alvo
    let (status, _) = app.post("/api/clients", &root, json!({ "name": "Sem empresa" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = app
        .call(
            Call::new(Method::POST, "/api/clients")
                .token(&root)
                .company(&maria_company)
                .json(json!({ "name": "Açougue" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["companyId"], maria_company.as_str());
}

#[tokio::test]
async fn malformed_company_header_is_a_bad_request() {
    let app = spawn().await;
    let root = app.super_admin().await;

    let (status, body) = app
        .call(Call::new(Method::GET, "/api/clients").token(&root).company("nao-e-uuid"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The x-company-id header must be a valid UUID.");
}

#[tokio::test]
async fn admin_builds_the_team() {
    let app = spawn().await;
    let admin = app.sign_up("maria", Some("Loja")).await;
    let staff = app.sign_up("joao", None).await;

    let (status, member) = app.post("/api/team", &admin, json!({ "username": "joao" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["role"], "staff");
    let member_id = member["id"].as_str().unwrap().to_string();

    // Perfil relido a cada requisição: o acesso vale na hora
    let (status, _) = app.get("/api/clients", &staff).await;
    assert_eq!(status, StatusCode::OK);

    // Staff não gerencia equipe; admin não concede super_admin
    let (status, _) = app.post("/api/team", &staff, json!({ "username": "maria" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let role_uri = format!("/api/team/{}/role", member_id);
    let (status, _) = app
        .call(Call::new(Method::PATCH, &role_uri).token(&admin).json(json!({ "role": "super_admin" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, promoted) = app
        .call(Call::new(Method::PATCH, &role_uri).token(&admin).json(json!({ "role": "manager" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["role"], "manager");

    let (_, team) = app.get("/api/team", &admin).await;
    assert_eq!(team.as_array().unwrap().len(), 2);

    let member_uri = format!("/api/team/{}", member_id);
    let (status, removed) = app.call(Call::new(Method::DELETE, &member_uri).token(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(removed["companyId"].is_null());

    let (status, _) = app.get("/api/clients", &staff).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_cannot_enlist_the_super_admin() {
    let app = spawn().await;
    let admin = app.sign_up("maria", Some("Loja")).await;

    let (status, _) = app.post("/api/team", &admin, json!({ "username": "root", "role": "staff" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Continua gerenciando empresas
    let root = app.super_admin().await;
    let (status, _) = app.get("/api/companies", &root).await;
    assert_eq!(status, StatusCode::OK);
    let (_, profile) = app.get("/api/profile", &root).await;
    assert_eq!(profile["role"], "super_admin");
    assert!(profile["companyId"].is_null());
}
