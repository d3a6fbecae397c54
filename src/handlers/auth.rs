// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{bearer_token, AuthenticatedUser},
        i18n::Locale,
    },
    models::auth::{AuthResponse, SessionResponse, SignInPayload, SignUpPayload},
};

// POST /api/auth/sign-up
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    tag = "Auth",
    request_body = SignUpPayload,
    responses(
        (status = 201, description = "Conta criada e sessão aberta", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail ou username já existe")
    )
)]
pub async fn sign_up(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SignUpPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .sign_up(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(response)))
}

// POST /api/auth/sign-in
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    tag = "Auth",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn sign_in(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SignInPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// POST /api/auth/sign-out
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    tag = "Auth",
    responses(
        (status = 204, description = "Sessão encerrada"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn sign_out(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> impl IntoResponse {
    app_state.auth_service.sign_out(session.session_id).await;
    tracing::info!("👋 Sessão {} encerrada", session.session_id);
    StatusCode::NO_CONTENT
}

// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão atual (ou null)", body = SessionResponse)
    ),
    security((), ("api_jwt" = []))
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    locale: Locale,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .auth_service
        .get_session(bearer_token(&headers))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}
