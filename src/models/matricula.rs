//! Modelo de Matrícula
//!
//! Registro de vehículos de una empresa. El número de matrícula es único a
//! nivel de plataforma; las matrículas pueden crearse automáticamente cuando
//! una venta referencia una matrícula desconocida.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Matrícula principal - mapea exactamente a la tabla matriculas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Matricula {
    pub id: Uuid,
    pub nro_matricula: String,
    pub tracker_id: Option<String>,
    pub empresa_id: Option<Uuid>,
    pub usuario_creacion: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Matricula {
    /// Matrícula creada automáticamente a partir de una venta
    pub fn auto_creada(nro_matricula: String, empresa_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nro_matricula,
            tracker_id: None,
            empresa_id,
            usuario_creacion: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request para crear una nueva matrícula
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatriculaRequest {
    #[validate(length(min = 1, max = 20))]
    pub nro_matricula: String,

    #[validate(length(max = 100))]
    pub tracker_id: Option<String>,

    pub empresa_id: Option<Uuid>,
}

/// Request para actualizar una matrícula (solo tracker_id es editable)
#[derive(Debug, Deserialize)]
pub struct UpdateMatriculaRequest {
    pub tracker_id: Option<String>,
}

/// Response de matrícula para la API
#[derive(Debug, Clone, Serialize)]
pub struct MatriculaResponse {
    pub id: Uuid,
    pub nro_matricula: String,
    pub tracker_id: Option<String>,
    pub empresa_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Matricula> for MatriculaResponse {
    fn from(matricula: Matricula) -> Self {
        Self {
            id: matricula.id,
            nro_matricula: matricula.nro_matricula,
            tracker_id: matricula.tracker_id,
            empresa_id: matricula.empresa_id,
            created_at: matricula.created_at,
            updated_at: matricula.updated_at,
        }
    }
}
