//! API endpoints
//!
//! Este módulo contiene los endpoints de la API y el router principal.

pub mod auth;
pub mod dashboard;
pub mod empresas;
pub mod matriculas;
pub mod registrar;
pub mod usuarios;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::{middleware::auth_middleware, state::AppState};

/// Crear el router principal de la API
pub fn create_api_router(state: AppState) -> Router<AppState> {
    // Rutas que exigen un JWT válido
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/empresas",
            get(empresas::list_empresas).post(empresas::create_empresa),
        )
        .route(
            "/api/empresas/:id",
            get(empresas::get_empresa).put(empresas::update_empresa),
        )
        .route(
            "/api/empresas/:id/estado",
            patch(empresas::cambiar_estado_empresa),
        )
        .route(
            "/api/usuarios",
            get(usuarios::list_usuarios).post(usuarios::create_usuario),
        )
        .route(
            "/api/usuarios/:id",
            get(usuarios::get_usuario).put(usuarios::update_usuario),
        )
        .route(
            "/api/usuarios/:id/estado",
            patch(usuarios::cambiar_estado_usuario),
        )
        .route(
            "/api/matriculas",
            get(matriculas::list_matriculas).post(matriculas::create_matricula),
        )
        .route(
            "/api/matriculas/:id",
            get(matriculas::get_matricula).put(matriculas::update_matricula),
        )
        .route("/api/dashboard", get(dashboard::company_dashboard))
        .route("/api/admin/dashboard", get(dashboard::platform_dashboard))
        .route_layer(from_fn_with_state(state, auth_middleware));

    // Login y la ingesta de la red de estaciones quedan fuera del JWT
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/registrar", post(registrar::registrar_venta))
        .merge(protected)
}
