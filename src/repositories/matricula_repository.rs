use sqlx::PgPool;
use uuid::Uuid;

use crate::models::matricula::Matricula;
use crate::utils::errors::AppError;

pub struct MatriculaRepository {
    pool: PgPool,
}

impl MatriculaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, matricula: &Matricula) -> Result<Matricula, AppError> {
        let result = sqlx::query_as::<_, Matricula>(
            r#"
            INSERT INTO matriculas (
                id, nro_matricula, tracker_id, empresa_id, usuario_creacion,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(matricula.id)
        .bind(&matricula.nro_matricula)
        .bind(&matricula.tracker_id)
        .bind(matricula.empresa_id)
        .bind(matricula.usuario_creacion)
        .bind(matricula.created_at)
        .bind(matricula.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Matricula>, AppError> {
        let result = sqlx::query_as::<_, Matricula>("SELECT * FROM matriculas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_nro(&self, nro_matricula: &str) -> Result<Option<Matricula>, AppError> {
        let result =
            sqlx::query_as::<_, Matricula>("SELECT * FROM matriculas WHERE nro_matricula = $1")
                .bind(nro_matricula)
                .fetch_optional(&self.pool)
                .await?;

        Ok(result)
    }

    pub async fn nro_exists(&self, nro_matricula: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM matriculas WHERE nro_matricula = $1)")
                .bind(nro_matricula)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn list(&self) -> Result<Vec<Matricula>, AppError> {
        let result =
            sqlx::query_as::<_, Matricula>("SELECT * FROM matriculas ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(result)
    }

    /// Solo tracker_id es editable después de la creación
    pub async fn update_tracker(
        &self,
        id: Uuid,
        tracker_id: Option<&str>,
    ) -> Result<Option<Matricula>, AppError> {
        let result = sqlx::query_as::<_, Matricula>(
            "UPDATE matriculas SET tracker_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(tracker_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Buscar por número y crear automáticamente si no existe (ingesta de ventas)
    pub async fn find_or_create_por_nro(
        &self,
        nro_matricula: &str,
        empresa_id: Option<Uuid>,
    ) -> Result<Matricula, AppError> {
        if let Some(matricula) = self.find_by_nro(nro_matricula).await? {
            return Ok(matricula);
        }

        let matricula = Matricula::auto_creada(nro_matricula.to_string(), empresa_id);
        tracing::info!("Matrícula creada automáticamente - Nro: {}", nro_matricula);
        self.create(&matricula).await
    }
}
