//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para manejo de JWT tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::EnvironmentConfig, utils::errors::AppError};

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user_id
    pub username: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa_id: Option<String>,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_hours: config.jwt_expiration_hours,
        }
    }
}

/// Generar JWT token para un usuario
pub fn generate_token(
    user_id: Uuid,
    username: &str,
    role: &str,
    empresa_id: Option<Uuid>,
    config: &JwtConfig,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::hours(config.expiration_hours);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role: role.to_string(),
        empresa_id: empresa_id.map(|id| id.to_string()),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::Jwt(
            "Header Authorization debe comenzar con 'Bearer '".to_string(),
        ));
    }

    let token = &auth_header[7..];
    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "un-secreto-de-prueba".to_string(),
            expiration_hours: 3,
        }
    }

    #[test]
    fn generar_y_verificar_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let empresa_id = Uuid::new_v4();

        let token = generate_token(user_id, "jperez", "admin", Some(empresa_id), &config)
            .expect("el token debe generarse");
        let claims = verify_token(&token, &config).expect("el token debe verificarse");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "jperez");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.empresa_id, Some(empresa_id.to_string()));
    }

    #[test]
    fn verificar_rechaza_secret_incorrecto() {
        let config = test_config();
        let otra_config = JwtConfig {
            secret: "otro-secreto".to_string(),
            expiration_hours: 3,
        };

        let token = generate_token(Uuid::new_v4(), "jperez", "user", None, &config)
            .expect("el token debe generarse");
        assert!(verify_token(&token, &otra_config).is_err());
    }

    #[test]
    fn extraer_token_del_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").ok(), Some("abc.def.ghi"));
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
