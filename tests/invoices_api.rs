// tests/invoices_api.rs

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn, Call, TestApp};

struct Shop {
    token: String,
    client_id: String,
    supplier_id: String,
    product_id: String,
}

async fn open_shop(app: &TestApp) -> Shop {
    let token = app.sign_up("maria", Some("Loja da Maria")).await;

    let (_, client) = app.post("/api/clients", &token, json!({ "name": "Padaria" })).await;
    let (_, supplier) = app
        .post("/api/suppliers", &token, json!({ "name": "Distribuidora", "contactPerson": "Carlos" }))
        .await;
    let (status, product) = app
        .post(
            "/api/products",
            &token,
            json!({ "name": "Café 500g", "category": "Mercearia", "price": 25, "stock": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", product);

    Shop {
        token,
        client_id: client["id"].as_str().unwrap().to_string(),
        supplier_id: supplier["id"].as_str().unwrap().to_string(),
        product_id: product["id"].as_str().unwrap().to_string(),
    }
}

fn line(description: &str, quantity: i64, unit_price: f64) -> Value {
    // `amount` errado de propósito: o servidor recalcula
    json!({ "description": description, "quantity": quantity, "unitPrice": unit_price, "amount": 999 })
}

#[tokio::test]
async fn invoice_total_is_derived_from_its_lines() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let (status, invoice) = app
        .post(
            "/api/invoices",
            &shop.token,
            json!({
                "clientId": shop.client_id,
                "date": "2026-01-01",
                "dueDate": "2026-01-31",
                "items": [line("Café", 2, 25.0), line("Frete", 1, 100.0)],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", invoice);
    assert!(invoice["number"].as_str().unwrap().starts_with("INV-"));
    assert_eq!(invoice["status"], "draft");
    assert_eq!(invoice["items"][0]["amount"].as_f64(), Some(50.0));
    assert_eq!(invoice["totalAmount"].as_f64(), Some(150.0));

    // Trocar as linhas recalcula o total
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());
    let (status, updated) = app
        .call(
            Call::new(Method::PUT, &uri)
                .token(&shop.token)
                .json(json!({ "status": "paid", "items": [line("Café", 3, 25.0)] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["status"], "paid");
    assert_eq!(updated["items"].as_array().unwrap().len(), 1);
    assert_eq!(updated["totalAmount"].as_f64(), Some(75.0));

    let (_, summary) = app.get("/api/dashboard/summary", &shop.token).await;
    assert_eq!(summary["invoices"], 1);
    assert_eq!(summary["revenue"].as_f64(), Some(75.0));
}

#[tokio::test]
async fn invoices_need_items_and_a_local_client() {
    let app = spawn().await;
    let shop = open_shop(&app).await;
    let other = app.sign_up("joao", Some("Loja do Joao")).await;

    let empty = json!({ "clientId": shop.client_id, "date": "2026-01-01", "dueDate": "2026-01-31", "items": [] });
    let (status, body) = app.post("/api/invoices", &shop.token, empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["items"][0], "An invoice needs at least one line item.");

    let bad_line = json!({
        "clientId": shop.client_id,
        "date": "2026-01-01",
        "dueDate": "2026-01-31",
        "items": [line("Café", 0, -1.0)],
    });
    let (status, body) = app.post("/api/invoices", &shop.token, bad_line).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["items[0].quantity"].is_array(), "{}", body);

    // Cliente de outra empresa não serve
    let foreign = json!({
        "clientId": shop.client_id,
        "date": "2026-01-01",
        "dueDate": "2026-01-31",
        "items": [line("Café", 1, 25.0)],
    });
    let (status, body) = app.post("/api/invoices", &other, foreign).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Client not found.");
}

#[tokio::test]
async fn supplier_invoices_feed_expected_inventory() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let (status, invoice) = app
        .post(
            "/api/supplier-invoices",
            &shop.token,
            json!({
                "supplierId": shop.supplier_id,
                "date": "2026-02-01",
                "dueDate": "2026-03-01",
                "status": "pending",
                "items": [{
                    "productId": shop.product_id,
                    "description": "Café 500g",
                    "quantity": 12,
                    "unitPrice": 18.5,
                }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", invoice);
    assert!(invoice["number"].as_str().unwrap().starts_with("SINV-"));
    assert_eq!(invoice["totalAmount"].as_f64(), Some(222.0));

    let (_, inventory) = app.get("/api/inventory", &shop.token).await;
    assert_eq!(inventory[0]["level"], "low_stock");

    let (_, expected) = app.get("/api/inventory/expected", &shop.token).await;
    assert_eq!(expected[0]["currentStock"], 4);
    assert_eq!(expected[0]["incoming"].as_f64(), Some(12.0));
    assert_eq!(expected[0]["expectedStock"].as_f64(), Some(16.0));
}

#[tokio::test]
async fn line_item_editor_uses_the_catalogue() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let (status, added) = app
        .post("/api/line-items/edit", &shop.token, json!({ "items": [], "change": { "action": "add" } }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", added);
    assert_eq!(added["items"].as_array().unwrap().len(), 1);
    assert_eq!(added["total"].as_f64(), Some(0.0));

    let (_, picked) = app
        .post(
            "/api/line-items/edit",
            &shop.token,
            json!({
                "items": added["items"],
                "change": { "action": "update", "index": 0, "edit": { "field": "product", "value": shop.product_id } },
            }),
        )
        .await;
    assert_eq!(picked["items"][0]["description"], "Café 500g");
    assert_eq!(picked["items"][0]["productId"], shop.product_id.as_str());
    assert_eq!(picked["total"].as_f64(), Some(25.0));

    let (_, doubled) = app
        .post(
            "/api/line-items/edit",
            &shop.token,
            json!({
                "items": picked["items"],
                "change": { "action": "update", "index": 0, "edit": { "field": "quantity", "value": 2 } },
            }),
        )
        .await;
    assert_eq!(doubled["total"].as_f64(), Some(50.0));

    // A última linha nunca sai
    let (_, kept) = app
        .post(
            "/api/line-items/edit",
            &shop.token,
            json!({ "items": doubled["items"], "change": { "action": "remove", "index": 0 } }),
        )
        .await;
    assert_eq!(kept["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_client_keeps_its_invoices() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let (_, invoice) = app
        .post(
            "/api/invoices",
            &shop.token,
            json!({
                "clientId": shop.client_id,
                "date": "2026-01-01",
                "dueDate": "2026-01-31",
                "items": [line("Café", 1, 25.0)],
            }),
        )
        .await;

    let client_uri = format!("/api/clients/{}", shop.client_id);
    let (status, _) = app.call(Call::new(Method::DELETE, &client_uri).token(&shop.token)).await;
    assert_eq!(status, StatusCode::OK);

    let invoice_uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());
    let (status, kept) = app.get(&invoice_uri, &shop.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["clientId"], shop.client_id.as_str());

    let (status, _) = app.call(Call::new(Method::DELETE, &invoice_uri).token(&shop.token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&invoice_uri, &shop.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pdf_without_fonts_reports_the_missing_fonts() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let (_, invoice) = app
        .post(
            "/api/invoices",
            &shop.token,
            json!({
                "clientId": shop.client_id,
                "date": "2026-01-01",
                "dueDate": "2026-01-31",
                "items": [line("Café", 1, 25.0)],
            }),
        )
        .await;

    let uri = format!("/api/invoices/{}/pdf", invoice["id"].as_str().unwrap());
    let (status, body) = app.get(&uri, &shop.token).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Document fonts are not installed on the server.");
}

#[tokio::test]
async fn oversized_numbers_are_rejected_not_multiplied() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let huge = json!({
        "clientId": shop.client_id,
        "date": "2026-01-01",
        "dueDate": "2026-01-31",
        "items": [{
            "description": "Ouro",
            "quantity": "20000000000000000000",
            "unitPrice": "10000000000000000000",
        }],
    });
    let (status, body) = app.post("/api/invoices", &shop.token, huge).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["details"]["items[0].quantity"][0], "Must be at most 1,000,000,000.");
    assert_eq!(body["details"]["items[0].unit_price"][0], "Price must be at most 1,000,000,000.");

    let (_, invoices) = app.get("/api/invoices", &shop.token).await;
    assert!(invoices.as_array().unwrap().is_empty());

    // Produto com preço acima do teto também não entra
    let (status, _) = app
        .post(
            "/api/products",
            &shop.token,
            json!({ "name": "Ouro", "category": "Metais", "price": "10000000000000000000", "stock": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn line_item_editor_rejects_oversized_numbers() {
    let app = spawn().await;
    let shop = open_shop(&app).await;

    let (status, body) = app
        .post(
            "/api/line-items/edit",
            &shop.token,
            json!({
                "items": [line("Café", 1, 25.0)],
                "change": { "action": "update", "index": 0, "edit": { "field": "quantity", "value": "20000000000000000000" } },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["details"]["change"][0], "Must be at most 1,000,000,000.");

    let huge_line = json!({ "description": "Ouro", "quantity": "20000000000000000000", "unitPrice": "10000000000000000000" });
    let (status, body) = app
        .post("/api/line-items/edit", &shop.token, json!({ "items": [huge_line], "change": { "action": "add" } }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(body["details"]["items[0].quantity"].is_array(), "{}", body);

    // Negativo dentro do limite continua aceito
    let (status, edited) = app
        .post(
            "/api/line-items/edit",
            &shop.token,
            json!({
                "items": [line("Café", 1, 25.0)],
                "change": { "action": "update", "index": 0, "edit": { "field": "quantity", "value": -2 } },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["total"].as_f64(), Some(-50.0));
}

#[tokio::test]
async fn invoices_of_another_company_are_not_found() {
    let app = spawn().await;
    let shop = open_shop(&app).await;
    let other = app.sign_up("joao", Some("Loja do Joao")).await;

    let (_, invoice) = app
        .post(
            "/api/invoices",
            &shop.token,
            json!({
                "clientId": shop.client_id,
                "date": "2026-01-01",
                "dueDate": "2026-01-31",
                "items": [line("Café", 1, 25.0)],
            }),
        )
        .await;
    let uri = format!("/api/invoices/{}", invoice["id"].as_str().unwrap());

    let (status, _) = app.get(&uri, &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.call(Call::new(Method::DELETE, &uri).token(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("{}/pdf", uri), &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let client_uri = format!("/api/clients/{}", shop.client_id);
    let (status, _) = app
        .call(Call::new(Method::PUT, &client_uri).token(&other).json(json!({ "name": "Invadida" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // O dono segue vendo tudo intacto
    let (status, _) = app.get(&uri, &shop.token).await;
    assert_eq!(status, StatusCode::OK);
    let (_, client) = app.get(&client_uri, &shop.token).await;
    assert_eq!(client["name"], "Padaria");
}
