//! Configuración de conexión a PostgreSQL
//!
//! Este módulo maneja la conexión a la base de datos PostgreSQL.

use anyhow::Result;
use sqlx::PgPool;

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(database_url: Option<&str>) -> Result<PgPool> {
    let database_url = match database_url {
        Some(url) => url.to_string(),
        None => std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment variables"))?,
    };

    let pool = PgPool::connect(&database_url).await?;

    Ok(pool)
}

/// Ejecutar migraciones embebidas de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
