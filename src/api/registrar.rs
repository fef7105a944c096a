//! Endpoint de ingesta de ventas
//!
//! La red de estaciones empuja cada venta con Basic auth y un body en
//! camelCase. Empresas y matrículas desconocidas se crean automáticamente
//! para no perder la venta.

use axum::{extract::State, http::HeaderMap, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::venta::{
        calcular_subtotal, parse_fecha_venta, RegistrarVentaRequest, RegistrarVentaResponse,
        Venta, VentaLinea,
    },
    repositories::{EmpresaRepository, MatriculaRepository, VentaRepository},
    state::AppState,
    utils::errors::{AppError, AppResult},
};

/// Validar las credenciales Basic del header Authorization
fn verificar_basic_auth(headers: &HeaderMap, state: &AppState) -> AppResult<()> {
    let header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Credenciales requeridas".to_string()))?;

    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(|| AppError::Unauthorized("Se requiere autenticación Basic".to_string()))?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AppError::Unauthorized("Credenciales inválidas".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

    if username != state.config.ingest_username || password != state.config.ingest_password {
        return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
    }

    Ok(())
}

pub async fn registrar_venta(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegistrarVentaRequest>,
) -> AppResult<Json<RegistrarVentaResponse>> {
    verificar_basic_auth(&headers, &state)?;

    // Resolver o crear la empresa a partir del RUC del cliente
    let empresa_id = match request.ruc.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(ruc) => {
            let nombre = request
                .nombre_cliente
                .clone()
                .unwrap_or_else(|| ruc.to_string());
            let empresa = EmpresaRepository::new(state.pool.clone())
                .find_or_create_por_ruc(ruc, &nombre)
                .await?;
            Some(empresa.id)
        }
        None => None,
    };

    // Resolver o crear la matrícula del vehículo
    let matricula_id = match request.matricula.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(nro) => {
            let matricula = MatriculaRepository::new(state.pool.clone())
                .find_or_create_por_nro(nro, empresa_id)
                .await?;
            Some(matricula.id)
        }
        None => None,
    };

    let fecha = parse_fecha_venta(request.fecha.as_deref());
    if fecha.is_none() && request.fecha.is_some() {
        tracing::warn!(
            "Fecha de venta no parseable, se almacena sin fecha: {:?}",
            request.fecha
        );
    }

    let venta_id = Uuid::new_v4();
    let venta = Venta {
        id: venta_id,
        empresa_id,
        matricula_id,
        tipo: request.tipo,
        identificador_tr: request.identificador_tr,
        ticket: request.ticket,
        fecha,
        codigo_cliente: request.codigo_cliente,
        ruc_cliente: request.ruc,
        nombre_cliente: request.nombre_cliente,
        codigo_estacion: request.codigo_estacion,
        nombre_estacion: request.nombre_estacion,
        codigo_moneda: request.codigo_moneda,
        total: request.total,
        documento_chofer: request.documento_chofer,
        nombre_chofer: request.nombre_chofer,
        matricula: request.matricula,
        kilometraje: request.kilometraje,
        tarjeta: request.tarjeta,
        created_at: Utc::now(),
    };

    let lineas: Vec<VentaLinea> = request
        .lineas
        .into_iter()
        .map(|linea| VentaLinea {
            id: Uuid::new_v4(),
            venta_id,
            subtotal: calcular_subtotal(linea.precio_unitario, linea.cantidad),
            codigo_producto: linea.codigo_producto,
            nombre_producto: linea.nombre_producto,
            precio_unitario: linea.precio_unitario,
            cantidad: linea.cantidad,
        })
        .collect();

    VentaRepository::new(state.pool.clone())
        .create(&venta, &lineas)
        .await?;

    tracing::info!(
        "Venta registrada - id: {}, ticket: {:?}, lineas: {}",
        venta_id,
        venta.ticket,
        lineas.len()
    );

    Ok(Json(RegistrarVentaResponse { ok: true }))
}
