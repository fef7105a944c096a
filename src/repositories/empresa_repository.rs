use sqlx::PgPool;
use uuid::Uuid;

use crate::models::empresa::Empresa;
use crate::utils::errors::AppError;

pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, empresa: &Empresa) -> Result<Empresa, AppError> {
        let result = sqlx::query_as::<_, Empresa>(
            r#"
            INSERT INTO empresas (
                id, razon_social, nombre_comercial, ruc, direccion,
                correo_referencia, numero_referencia, activo, usuario_creacion,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(empresa.id)
        .bind(&empresa.razon_social)
        .bind(&empresa.nombre_comercial)
        .bind(&empresa.ruc)
        .bind(&empresa.direccion)
        .bind(&empresa.correo_referencia)
        .bind(&empresa.numero_referencia)
        .bind(empresa.activo)
        .bind(empresa.usuario_creacion)
        .bind(empresa.created_at)
        .bind(empresa.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_ruc(&self, ruc: &str) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE ruc = $1")
            .bind(ruc)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn ruc_exists(&self, ruc: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM empresas WHERE ruc = $1)")
                .bind(ruc)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn list(&self) -> Result<Vec<Empresa>, AppError> {
        let result =
            sqlx::query_as::<_, Empresa>("SELECT * FROM empresas ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(result)
    }

    pub async fn update(
        &self,
        id: Uuid,
        razon_social: Option<&str>,
        nombre_comercial: Option<&str>,
        direccion: Option<&str>,
        correo_referencia: Option<&str>,
        numero_referencia: Option<&str>,
    ) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>(
            r#"
            UPDATE empresas SET
                razon_social = COALESCE($2, razon_social),
                nombre_comercial = COALESCE($3, nombre_comercial),
                direccion = COALESCE($4, direccion),
                correo_referencia = COALESCE($5, correo_referencia),
                numero_referencia = COALESCE($6, numero_referencia),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(razon_social)
        .bind(nombre_comercial)
        .bind(direccion)
        .bind(correo_referencia)
        .bind(numero_referencia)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn set_activo(&self, id: Uuid, activo: bool) -> Result<Option<Empresa>, AppError> {
        let result = sqlx::query_as::<_, Empresa>(
            "UPDATE empresas SET activo = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(activo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Buscar por RUC y crear automáticamente si no existe (ingesta de ventas)
    pub async fn find_or_create_por_ruc(
        &self,
        ruc: &str,
        nombre: &str,
    ) -> Result<Empresa, AppError> {
        if let Some(empresa) = self.find_by_ruc(ruc).await? {
            return Ok(empresa);
        }

        let empresa = Empresa::auto_creada(ruc.to_string(), nombre.to_string());
        tracing::info!("Empresa creada automáticamente - RUC: {}, Nombre: {}", ruc, nombre);
        self.create(&empresa).await
    }
}
