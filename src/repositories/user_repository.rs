use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::errors::AppError;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, email, name, last_name, ruc, username, password_hash,
                role, empresa_id, activo, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.ruc)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.empresa_id)
        .bind(user.activo)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Listado, opcionalmente filtrado por empresa, del más reciente al más antiguo
    pub async fn list(&self, empresa_id: Option<Uuid>) -> Result<Vec<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::uuid IS NULL OR empresa_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn email_exists(&self, email: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        self.exists("email", email, excluir).await
    }

    pub async fn username_exists(
        &self,
        username: &str,
        excluir: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.exists("username", username, excluir).await
    }

    pub async fn ruc_exists(&self, ruc: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        self.exists("ruc", ruc, excluir).await
    }

    // columna proviene de constantes internas, nunca de input del usuario
    async fn exists(
        &self,
        columna: &str,
        valor: &str,
        excluir: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1 AND ($2::uuid IS NULL OR id <> $2))",
            columna
        );
        let result: (bool,) = sqlx::query_as(&query)
            .bind(valor)
            .bind(excluir)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        email: &str,
        name: &str,
        last_name: &str,
        ruc: &str,
        username: &str,
        role: &str,
        empresa_id: Option<Uuid>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = $2,
                name = $3,
                last_name = $4,
                ruc = $5,
                username = $6,
                role = $7,
                empresa_id = $8,
                password_hash = COALESCE($9, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(last_name)
        .bind(ruc)
        .bind(username)
        .bind(role)
        .bind(empresa_id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn set_activo(&self, id: Uuid, activo: bool) -> Result<Option<User>, AppError> {
        let result = sqlx::query_as::<_, User>(
            "UPDATE users SET activo = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(activo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }
}
