//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use crate::utils::errors::AppError;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cors_origins: Vec<String>,
    // Credenciales Basic Auth del endpoint de ingesta de ventas (/registrar)
    pub ingest_username: String,
    pub ingest_password: String,
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| AppError::Internal("PORT must be a valid number".to_string()))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| AppError::Internal("JWT_SECRET must be set".to_string()))?,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Internal("JWT_EXPIRATION_HOURS must be a valid number".to_string())
                })?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            ingest_username: env::var("INGEST_API_USERNAME").unwrap_or_else(|_| "user".to_string()),
            ingest_password: env::var("INGEST_API_PASSWORD").unwrap_or_else(|_| "pass".to_string()),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
