//! Modelo de Empresa
//!
//! Este módulo contiene el struct Empresa y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Empresa principal - mapea exactamente a la tabla empresas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Empresa {
    pub id: Uuid,
    pub razon_social: String,
    pub nombre_comercial: String,
    pub ruc: String,
    pub direccion: String,
    pub correo_referencia: Option<String>,
    pub numero_referencia: Option<String>,
    pub activo: bool,
    pub usuario_creacion: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Empresa {
    /// Empresa creada automáticamente a partir de una venta con RUC desconocido
    pub fn auto_creada(ruc: String, nombre: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            razon_social: nombre.clone(),
            nombre_comercial: nombre,
            ruc,
            direccion: String::new(),
            correo_referencia: None,
            numero_referencia: None,
            activo: true,
            usuario_creacion: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request para crear una nueva empresa
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmpresaRequest {
    #[validate(length(min = 2, max = 255))]
    pub razon_social: String,

    #[validate(length(min = 2, max = 255))]
    pub nombre_comercial: String,

    #[validate(length(min = 5, max = 20))]
    pub ruc: String,

    #[validate(length(min = 1, max = 500))]
    pub direccion: String,

    #[validate(email)]
    pub correo_referencia: Option<String>,

    #[validate(length(max = 50))]
    pub numero_referencia: Option<String>,

    pub activo: Option<bool>,
}

/// Request para actualizar una empresa existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmpresaRequest {
    #[validate(length(min = 2, max = 255))]
    pub razon_social: Option<String>,

    #[validate(length(min = 2, max = 255))]
    pub nombre_comercial: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub direccion: Option<String>,

    #[validate(email)]
    pub correo_referencia: Option<String>,

    #[validate(length(max = 50))]
    pub numero_referencia: Option<String>,
}

/// Request para activar/inactivar una empresa
#[derive(Debug, Deserialize)]
pub struct CambiarEstadoRequest {
    pub activo: bool,
}

/// Response de empresa para la API
#[derive(Debug, Clone, Serialize)]
pub struct EmpresaResponse {
    pub id: Uuid,
    pub razon_social: String,
    pub nombre_comercial: String,
    pub ruc: String,
    pub direccion: String,
    pub correo_referencia: Option<String>,
    pub numero_referencia: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Empresa> for EmpresaResponse {
    fn from(empresa: Empresa) -> Self {
        Self {
            id: empresa.id,
            razon_social: empresa.razon_social,
            nombre_comercial: empresa.nombre_comercial,
            ruc: empresa.ruc,
            direccion: empresa.direccion,
            correo_referencia: empresa.correo_referencia,
            numero_referencia: empresa.numero_referencia,
            activo: empresa.activo,
            created_at: empresa.created_at,
            updated_at: empresa.updated_at,
        }
    }
}
