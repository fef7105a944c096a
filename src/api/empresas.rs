//! Handlers CRUD de empresas

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthenticatedUser,
    models::empresa::{
        CambiarEstadoRequest, CreateEmpresaRequest, Empresa, EmpresaResponse,
        UpdateEmpresaRequest,
    },
    repositories::EmpresaRepository,
    state::AppState,
    utils::errors::{AppError, AppResult},
};

fn require_admin(user: &AuthenticatedUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Se requiere rol admin".to_string()))
    }
}

pub async fn list_empresas(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<EmpresaResponse>>> {
    require_admin(&user)?;

    let empresas = EmpresaRepository::new(state.pool.clone()).list().await?;
    Ok(Json(empresas.into_iter().map(EmpresaResponse::from).collect()))
}

pub async fn get_empresa(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EmpresaResponse>> {
    // Un usuario no-admin solo puede consultar su propia empresa
    if !user.is_admin() && user.empresa_id != Some(id) {
        return Err(AppError::Forbidden("Se requiere rol admin".to_string()));
    }

    let empresa = EmpresaRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Empresa no encontrada".to_string()))?;

    Ok(Json(EmpresaResponse::from(empresa)))
}

pub async fn create_empresa(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateEmpresaRequest>,
) -> AppResult<Json<EmpresaResponse>> {
    require_admin(&user)?;
    request.validate()?;

    let repo = EmpresaRepository::new(state.pool.clone());
    if repo.ruc_exists(&request.ruc).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe una empresa con RUC {}",
            request.ruc
        )));
    }

    let now = Utc::now();
    let empresa = Empresa {
        id: Uuid::new_v4(),
        razon_social: request.razon_social,
        nombre_comercial: request.nombre_comercial,
        ruc: request.ruc,
        direccion: request.direccion,
        correo_referencia: request.correo_referencia,
        numero_referencia: request.numero_referencia,
        activo: request.activo.unwrap_or(true),
        usuario_creacion: Some(user.user_id),
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(&empresa).await?;
    Ok(Json(EmpresaResponse::from(created)))
}

pub async fn update_empresa(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEmpresaRequest>,
) -> AppResult<Json<EmpresaResponse>> {
    require_admin(&user)?;
    request.validate()?;

    let updated = EmpresaRepository::new(state.pool.clone())
        .update(
            id,
            request.razon_social.as_deref(),
            request.nombre_comercial.as_deref(),
            request.direccion.as_deref(),
            request.correo_referencia.as_deref(),
            request.numero_referencia.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Empresa no encontrada".to_string()))?;

    Ok(Json(EmpresaResponse::from(updated)))
}

pub async fn cambiar_estado_empresa(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CambiarEstadoRequest>,
) -> AppResult<Json<EmpresaResponse>> {
    require_admin(&user)?;

    let updated = EmpresaRepository::new(state.pool.clone())
        .set_activo(id, request.activo)
        .await?
        .ok_or_else(|| AppError::NotFound("Empresa no encontrada".to_string()))?;

    Ok(Json(EmpresaResponse::from(updated)))
}
