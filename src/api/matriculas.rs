//! Handlers CRUD de matrículas

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthenticatedUser,
    models::matricula::{
        CreateMatriculaRequest, Matricula, MatriculaResponse, UpdateMatriculaRequest,
    },
    repositories::{EmpresaRepository, MatriculaRepository},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

pub async fn list_matriculas(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<MatriculaResponse>>> {
    let matriculas = MatriculaRepository::new(state.pool.clone()).list().await?;

    // Admin ve todas; usuario de empresa solo las de su empresa
    let visibles = matriculas
        .into_iter()
        .filter(|m| user.is_admin() || m.empresa_id == user.empresa_id)
        .map(MatriculaResponse::from)
        .collect();

    Ok(Json(visibles))
}

pub async fn get_matricula(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MatriculaResponse>> {
    let matricula = MatriculaRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Matrícula no encontrada".to_string()))?;

    if !user.is_admin() && matricula.empresa_id != user.empresa_id {
        return Err(AppError::Forbidden("Se requiere rol admin".to_string()));
    }

    Ok(Json(MatriculaResponse::from(matricula)))
}

pub async fn create_matricula(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateMatriculaRequest>,
) -> AppResult<Json<MatriculaResponse>> {
    request.validate()?;

    // Un usuario de empresa solo registra matrículas de su propia empresa
    let empresa_id = if user.is_admin() {
        request.empresa_id
    } else {
        user.empresa_id
    };

    if let Some(id) = empresa_id {
        EmpresaRepository::new(state.pool.clone())
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BadRequest("La empresa indicada no existe".to_string()))?;
    }

    let repo = MatriculaRepository::new(state.pool.clone());
    if repo.nro_exists(&request.nro_matricula).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe la matrícula {}",
            request.nro_matricula
        )));
    }

    let mut matricula = Matricula::auto_creada(request.nro_matricula, empresa_id);
    matricula.tracker_id = request.tracker_id;
    matricula.usuario_creacion = Some(user.user_id);

    let created = repo.create(&matricula).await?;
    Ok(Json(MatriculaResponse::from(created)))
}

pub async fn update_matricula(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMatriculaRequest>,
) -> AppResult<Json<MatriculaResponse>> {
    let repo = MatriculaRepository::new(state.pool.clone());

    let existente = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Matrícula no encontrada".to_string()))?;

    if !user.is_admin() && existente.empresa_id != user.empresa_id {
        return Err(AppError::Forbidden("Se requiere rol admin".to_string()));
    }

    let updated = repo
        .update_tracker(id, request.tracker_id.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Matrícula no encontrada".to_string()))?;

    Ok(Json(MatriculaResponse::from(updated)))
}
