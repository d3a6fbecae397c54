// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::SessionView,
};

/// Sessão validada, guardada nas extensions da requisição.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionView);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

// Rotas protegidas: sem token válido, 401
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store)
    })?;

    let session = app_state
        .auth_service
        .validate_token(token)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Insere a sessão nos "extensions" da requisição
    request.extensions_mut().insert(CurrentSession(session));
    Ok(next.run(request).await)
}

// Rotas públicas: anexa a sessão se houver, nunca rejeita
pub async fn optional_session(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers()).map(str::to_string);

    if let Some(token) = token {
        match app_state.auth_service.get_session(Some(&token)).await {
            Ok(response) => {
                if let Some(session) = response.session {
                    request.extensions_mut().insert(CurrentSession(session));
                }
            }
            Err(e) => tracing::warn!("Falha ao carregar a sessão: {}", e),
        }
    }

    next.run(request).await
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub SessionView);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .map(|current| AuthenticatedUser(current.0.clone()))
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&Locale::from_parts(parts), &state.i18n_store))
    }
}

/// Sessão opcional (getSession, navegação).
pub struct MaybeSession(pub Option<SessionView>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(parts.extensions.get::<CurrentSession>().map(|current| current.0.clone())))
    }
}
