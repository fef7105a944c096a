//! Fachada de reportes
//!
//! Resuelve la ventana, consulta los hechos ya filtrados y delega el
//! cómputo a los agregadores puros. Una empresa inexistente produce el
//! payload en cero en lugar de un error.

use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    middleware::AuthenticatedUser,
    models::dashboard::{CompanyDashboard, PlatformDashboard},
    repositories::{DashboardRepository, EmpresaRepository},
    services::{
        company_dashboard::build_company_dashboard,
        platform_dashboard::build_platform_dashboard,
        window::{parse_cant_dias, ReportWindow},
    },
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        validation::validate_uuid,
    },
};

#[derive(Debug, Deserialize)]
pub struct CompanyDashboardParams {
    pub empresa_id: Option<String>,
    pub cant_dias: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlatformDashboardParams {
    pub cant_dias: Option<String>,
}

pub async fn company_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<CompanyDashboardParams>,
) -> AppResult<Json<CompanyDashboard>> {
    let empresa_id = match params.empresa_id.as_deref() {
        Some(raw) => validate_uuid(raw)
            .map_err(|_| AppError::BadRequest("empresa_id debe ser un UUID válido".to_string()))?,
        None => user.empresa_id.ok_or_else(|| {
            AppError::BadRequest("empresa_id es requerido".to_string())
        })?,
    };

    // Un usuario de empresa solo consulta su propia empresa
    if !user.is_admin() && user.empresa_id != Some(empresa_id) {
        return Err(AppError::Forbidden("Se requiere rol admin".to_string()));
    }

    let cant_dias = parse_cant_dias(params.cant_dias.as_deref())?.ok_or_else(|| {
        AppError::BadRequest("cant_dias es requerido".to_string())
    })?;

    let referencia = Utc::now().date_naive();
    let window = ReportWindow::resolve(Some(cant_dias), referencia);

    let repo = DashboardRepository::new(state.pool.clone());

    // Empresa desconocida: payload en cero, sin error
    let empresa = EmpresaRepository::new(state.pool.clone())
        .find_by_id(empresa_id)
        .await?;
    if empresa.is_none() {
        tracing::warn!("Dashboard solicitado para empresa inexistente: {}", empresa_id);
    }

    let (ventas, detalles, total_matriculas) = if empresa.is_some() {
        (
            repo.ventas_empresa(empresa_id, &window).await?,
            repo.detalles_empresa(empresa_id, &window).await?,
            repo.total_matriculas(empresa_id).await?,
        )
    } else {
        (Vec::new(), Vec::new(), 0)
    };

    let payload = build_company_dashboard(&window, &ventas, &detalles, total_matriculas);
    Ok(Json(payload))
}

pub async fn platform_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PlatformDashboardParams>,
) -> AppResult<Json<PlatformDashboard>> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Se requiere rol admin".to_string()));
    }

    let cant_dias = parse_cant_dias(params.cant_dias.as_deref())?;
    let referencia = Utc::now().date_naive();
    let window = cant_dias.map(|n| ReportWindow::resolve(Some(n), referencia));

    let repo = DashboardRepository::new(state.pool.clone());
    let empresas = repo.estadisticas_empresas(window.as_ref()).await?;
    let usuarios_plataforma = repo.conteo_usuarios().await?;

    // Deltas de periodo solo existen con ventana y ventana anterior
    let activas_previas: HashSet<Uuid> = match window.as_ref().and_then(|w| w.previous()) {
        Some(previa) => repo
            .empresas_con_cargas(&previa)
            .await?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let payload = build_platform_dashboard(
        window.as_ref(),
        &empresas,
        usuarios_plataforma,
        &activas_previas,
        referencia,
    );
    Ok(Json(payload))
}
