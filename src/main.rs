mod api;
mod config;
mod database;
mod middleware;
mod models;
mod repositories;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use database::{create_pool, run_migrations};
use middleware::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()
        .map_err(|e| anyhow::anyhow!("configuración inválida: {}", e))?;

    // Configurar logging
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("⛽ Plataforma de cargas de combustible - API");
    info!("Entorno: {} ({})", config.environment, config.server_url());

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };
    run_migrations(&pool).await?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // En producción el CORS se restringe a los orígenes configurados
    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/health", get(health))
        .merge(api::create_api_router(app_state.clone()))
        .layer(cors)
        .with_state(app_state);

    info!("Servidor escuchando en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("instalar handler de Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("instalar handler de SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Apagado por Ctrl+C"),
        _ = terminate => info!("Apagado por SIGTERM"),
    }
}
