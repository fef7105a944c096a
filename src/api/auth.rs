//! Handlers de autenticación
//!
//! Login con username/password y consulta del perfil autenticado.

use axum::{extract::State, Extension, Json};
use bcrypt::verify;
use serde_json::json;

use crate::{
    middleware::AuthenticatedUser,
    models::user::{LoginRequest, LoginResponse, LoginUserSummary},
    repositories::UserRepository,
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        jwt::{generate_token, JwtConfig},
    },
};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username y password son requeridos".to_string(),
        ));
    }

    let user = UserRepository::new(state.pool.clone())
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario o contraseña inválidos".to_string()))?;

    let password_ok = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;
    if !password_ok {
        return Err(AppError::Unauthorized(
            "Usuario o contraseña inválidos".to_string(),
        ));
    }

    if !user.activo {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let jwt_config = JwtConfig::from(&state.config);
    let access_token = generate_token(
        user.id,
        &user.username,
        &user.role,
        user.empresa_id,
        &jwt_config,
    )?;

    Ok(Json(LoginResponse {
        access_token,
        user: LoginUserSummary {
            username: user.username,
            role: user.role,
            empresa_id: user.empresa_id,
        },
    }))
}

pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<serde_json::Value>> {
    Ok(Json(json!({
        "user": {
            "id": user.user_id,
            "username": user.username,
            "role": user.role,
            "empresa_id": user.empresa_id,
        }
    })))
}
