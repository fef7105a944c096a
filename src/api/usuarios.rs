//! Handlers CRUD de usuarios
//!
//! Los administradores gestionan cualquier usuario. Un usuario de empresa
//! solo ve el listado de su propia empresa.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthenticatedUser,
    models::user::{
        is_valid_role, CambiarEstadoRequest, CreateUserRequest, UpdateUserRequest, User,
        UserResponse,
    },
    repositories::{EmpresaRepository, UserRepository},
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

async fn validar_empresa(state: &AppState, empresa_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = empresa_id {
        EmpresaRepository::new(state.pool.clone())
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BadRequest("La empresa indicada no existe".to_string()))?;
    }
    Ok(())
}

pub async fn list_usuarios(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    // Admin ve todos; usuario de empresa solo los de su empresa
    let filtro = if user.is_admin() {
        None
    } else {
        match user.empresa_id {
            Some(id) => Some(id),
            None => return Err(AppError::Forbidden("Se requiere rol admin".to_string())),
        }
    };

    let usuarios = UserRepository::new(state.pool.clone()).list(filtro).await?;
    Ok(Json(usuarios.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_usuario(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let encontrado = UserRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    if !user.is_admin() && user.user_id != id && user.empresa_id != encontrado.empresa_id {
        return Err(AppError::Forbidden("Se requiere rol admin".to_string()));
    }

    Ok(Json(UserResponse::from(encontrado)))
}

pub async fn create_usuario(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;
    request.validate()?;

    if !is_valid_role(&request.role) {
        return Err(AppError::BadRequest(format!(
            "Rol inválido: {}",
            request.role
        )));
    }
    validar_empresa(&state, request.empresa_id).await?;

    let repo = UserRepository::new(state.pool.clone());
    if repo.username_exists(&request.username, None).await? {
        return Err(AppError::Conflict("El username ya está en uso".to_string()));
    }
    if repo.email_exists(&request.email, None).await? {
        return Err(AppError::Conflict("El email ya está en uso".to_string()));
    }
    if repo.ruc_exists(&request.ruc, None).await? {
        return Err(AppError::Conflict("El RUC ya está en uso".to_string()));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error generando hash: {}", e)))?;

    let nuevo = User {
        id: Uuid::new_v4(),
        email: request.email,
        name: request.name,
        last_name: request.last_name,
        ruc: request.ruc,
        username: request.username,
        password_hash,
        role: request.role,
        empresa_id: request.empresa_id,
        activo: true,
        created_at: Utc::now(),
    };

    let created = repo.create(&nuevo).await?;
    Ok(Json(UserResponse::from(created)))
}

pub async fn update_usuario(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;
    request.validate()?;

    if !is_valid_role(&request.role) {
        return Err(AppError::BadRequest(format!(
            "Rol inválido: {}",
            request.role
        )));
    }
    validar_empresa(&state, request.empresa_id).await?;

    let repo = UserRepository::new(state.pool.clone());
    if repo.username_exists(&request.username, Some(id)).await? {
        return Err(AppError::Conflict("El username ya está en uso".to_string()));
    }
    if repo.email_exists(&request.email, Some(id)).await? {
        return Err(AppError::Conflict("El email ya está en uso".to_string()));
    }
    if repo.ruc_exists(&request.ruc, Some(id)).await? {
        return Err(AppError::Conflict("El RUC ya está en uso".to_string()));
    }

    let password_hash = match &request.password {
        Some(password) => Some(
            hash(password, DEFAULT_COST)
                .map_err(|e| AppError::Hash(format!("Error generando hash: {}", e)))?,
        ),
        None => None,
    };

    let updated = repo
        .update(
            id,
            &request.email,
            &request.name,
            &request.last_name,
            &request.ruc,
            &request.username,
            &request.role,
            request.empresa_id,
            password_hash.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(updated)))
}

pub async fn cambiar_estado_usuario(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CambiarEstadoRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let updated = UserRepository::new(state.pool.clone())
        .set_activo(id, request.activo)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(updated)))
}
