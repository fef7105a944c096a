//! Modelo de User
//!
//! Usuarios de la plataforma: administradores de plataforma (empresa_id nulo)
//! y usuarios de empresa. El rol se almacena como texto ('admin' | 'user').

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Verificar que el rol sea uno de los permitidos
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_USER
}

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub ruc: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub empresa_id: Option<Uuid>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

/// Request para crear un nuevo usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 5, max = 20))]
    pub ruc: String,

    #[validate(length(min = 3, max = 100))]
    pub username: String,

    #[validate(length(min = 8))]
    pub password: String,

    pub role: String,

    pub empresa_id: Option<Uuid>,
}

/// Request para actualizar un usuario (password opcional)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(min = 5, max = 20))]
    pub ruc: String,

    #[validate(length(min = 3, max = 100))]
    pub username: String,

    #[validate(length(min = 8))]
    pub password: Option<String>,

    pub role: String,

    pub empresa_id: Option<Uuid>,
}

/// Response de usuario para la API (sin password_hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub ruc: String,
    pub username: String,
    pub role: String,
    pub empresa_id: Option<Uuid>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            last_name: user.last_name,
            ruc: user.ruc,
            username: user.username,
            role: user.role,
            empresa_id: user.empresa_id,
            activo: user.activo,
            created_at: user.created_at,
        }
    }
}

/// Request para activar/desactivar un usuario
#[derive(Debug, Deserialize)]
pub struct CambiarEstadoRequest {
    pub activo: bool,
}

/// Request de login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: LoginUserSummary,
}

#[derive(Debug, Serialize)]
pub struct LoginUserSummary {
    pub username: String,
    pub role: String,
    pub empresa_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_validos() {
        assert!(is_valid_role("admin"));
        assert!(is_valid_role("user"));
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
    }
}
