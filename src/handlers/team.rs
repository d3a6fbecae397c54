// src/handlers/team.rs

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
        access::{PageAccess, TeamPage},
        i18n::Locale,
    },
    models::profile::{AddTeamMemberPayload, ChangeRolePayload, Profile},
};

// GET /api/team
#[utoipa::path(
    get,
    path = "/api/team",
    tag = "Team",
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 200, description = "Membros da equipe", body = Vec<Profile>),
        (status = 403, description = "Sem empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_team(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<TeamPage>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let members = app_state
        .team_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(members))
}

// POST /api/team
#[utoipa::path(
    post,
    path = "/api/team",
    tag = "Team",
    request_body = AddTeamMemberPayload,
    params(("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")),
    responses(
        (status = 201, description = "Membro vinculado", body = Profile),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Username não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<TeamPage>,
    Json(payload): Json<AddTeamMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .team_service
        .add_member(access.profile(), scope, payload.username.trim(), payload.role)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}

// PATCH /api/team/{profile_id}/role
#[utoipa::path(
    patch,
    path = "/api/team/{profile_id}/role",
    tag = "Team",
    request_body = ChangeRolePayload,
    params(
        ("profile_id" = Uuid, Path, description = "ID do perfil"),
        ("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")
    ),
    responses(
        (status = 200, description = "Cargo alterado", body = Profile),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Perfil fora da equipe")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_role(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<TeamPage>,
    Path(profile_id): Path<Uuid>,
    Json(payload): Json<ChangeRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .team_service
        .change_role(access.profile(), scope, profile_id, payload.role)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}

// DELETE /api/team/{profile_id}
#[utoipa::path(
    delete,
    path = "/api/team/{profile_id}",
    tag = "Team",
    params(
        ("profile_id" = Uuid, Path, description = "ID do perfil"),
        ("x-company-id" = Option<Uuid>, Header, description = "Empresa (só super_admin)")
    ),
    responses(
        (status = 200, description = "Membro desvinculado", body = Profile),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Perfil fora da equipe")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_member(
    State(app_state): State<AppState>,
    locale: Locale,
    access: PageAccess<TeamPage>,
    Path(profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = access.scope().map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .team_service
        .remove_member(access.profile(), scope, profile_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(member))
}
