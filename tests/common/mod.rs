// tests/common/mod.rs
//
// Sobe o router completo sobre o armazenamento em memória.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use backoffice::{
    config::{AppState, Settings},
    db::Store,
    router,
};

pub const SUPER_ADMIN_EMAIL: &str = "root@backoffice.test";
pub const PASSWORD: &str = "segredo123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn spawn() -> TestApp {
    let mut settings = Settings::with_secret("segredo-de-teste");
    // Custo mínimo do bcrypt: os testes ficam rápidos
    settings.bcrypt_cost = 4;
    settings.fonts_dir = "./nao-existe".into();

    let state = AppState::new(settings, Store::memory()).unwrap();
    state.auth_service.ensure_super_admin(SUPER_ADMIN_EMAIL, PASSWORD).await.unwrap();

    TestApp { router: router::app(state.clone()), state }
}

pub struct Call<'a> {
    method: Method,
    uri: &'a str,
    token: Option<&'a str>,
    company: Option<String>,
    lang: Option<&'a str>,
    body: Option<Value>,
}

impl<'a> Call<'a> {
    pub fn new(method: Method, uri: &'a str) -> Self {
        Self { method, uri, token: None, company: None, lang: None, body: None }
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn company(mut self, company_id: impl ToString) -> Self {
        self.company = Some(company_id.to_string());
        self
    }

    pub fn lang(mut self, lang: &'a str) -> Self {
        self.lang = Some(lang);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl TestApp {
    pub async fn call(&self, call: Call<'_>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(call.method).uri(call.uri);
        if let Some(token) = call.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(company) = call.company {
            builder = builder.header("x-company-id", company);
        }
        if let Some(lang) = call.lang {
            builder = builder.header(header::ACCEPT_LANGUAGE, lang);
        }

        let request = match call.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Call::new(Method::GET, uri).token(token)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Call::new(Method::POST, uri).token(token).json(body)).await
    }

    /// Cadastra e devolve o token. Com `company`, o usuário vira admin dela.
    pub async fn sign_up(&self, username: &str, company: Option<&str>) -> String {
        let mut body = json!({
            "email": format!("{}@backoffice.test", username),
            "password": PASSWORD,
            "username": username,
            "fullName": format!("{} da Silva", username),
        });
        if let Some(company) = company {
            body["companyName"] = json!(company);
        }

        let (status, body) = self.call(Call::new(Method::POST, "/api/auth/sign-up").json(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn sign_in(&self, email: &str) -> String {
        let (status, body) = self
            .call(Call::new(Method::POST, "/api/auth/sign-in").json(json!({ "email": email, "password": PASSWORD })))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn super_admin(&self) -> String {
        self.sign_in(SUPER_ADMIN_EMAIL).await
    }

    /// Empresa do perfil dono do token.
    pub async fn company_of(&self, token: &str) -> String {
        let (_, profile) = self.get("/api/profile", token).await;
        profile["companyId"].as_str().unwrap().to_string()
    }
}
