//! Modelos de Dashboard
//!
//! Filas de entrada que el repositorio entrega al motor de agregación y
//! payloads de salida de los dos dashboards. Los montos y litros viajan como
//! números JSON redondeados a 2 decimales; las fechas como YYYY-MM-DD.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Filas de entrada (lectura del Entity Store)
// ---------------------------------------------------------------------------

/// Venta filtrada por empresa y ventana, proyectada para agregación
#[derive(Debug, Clone, FromRow)]
pub struct VentaAgregadaRow {
    pub fecha: NaiveDate,
    pub codigo_estacion: Option<String>,
    pub nombre_estacion: Option<String>,
    pub matricula: Option<String>,
    pub total: Option<Decimal>,
}

/// Fila de la vista venta_detalles (hechos Venta x VentaLinea)
#[derive(Debug, Clone, FromRow)]
pub struct DetalleAgregadoRow {
    pub fecha: NaiveDate,
    pub nombre_producto: Option<String>,
    pub matricula: Option<String>,
    pub cantidad: Option<Decimal>,
    pub subtotal: Option<Decimal>,
}

/// Estadísticas por empresa para el rollup de plataforma.
/// cargas y monto_total vienen ya acotados a la ventana cuando la hay;
/// ultima_carga es siempre la fecha de la venta más reciente de la vida
/// de la empresa.
#[derive(Debug, Clone, FromRow)]
pub struct EmpresaStatRow {
    pub id: Uuid,
    pub nombre_comercial: String,
    pub ruc: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub usuarios_total: i64,
    pub usuarios_activos: i64,
    pub matriculas: i64,
    pub cargas: i64,
    pub monto_total: Option<Decimal>,
    pub ultima_carga: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Payload del dashboard de empresa
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CompanyDashboard {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub encabezados: Encabezados,
    pub ventas_por_periodo: Vec<VentaDiaria>,
    pub indicadores: Indicadores,
    pub top_estaciones: Vec<EstacionRanking>,
    pub combustibles: Vec<CombustibleShare>,
    pub top_matriculas: Vec<MatriculaRanking>,
}

#[derive(Debug, Serialize)]
pub struct Encabezados {
    pub total_cargas: i64,
    pub total_venta: f64,
    pub litros_totales: f64,
    pub total_matriculas: i64,
}

#[derive(Debug, Serialize)]
pub struct VentaDiaria {
    pub fecha: NaiveDate,
    pub litros: f64,
    pub monto: f64,
}

#[derive(Debug, Serialize)]
pub struct Indicadores {
    pub ticket_promedio: f64,
    pub litros_por_carga: f64,
    pub estaciones: i64,
    pub matriculas: i64,
}

#[derive(Debug, Serialize)]
pub struct EstacionRanking {
    pub estacion: String,
    pub cargas: i64,
    pub monto: f64,
}

#[derive(Debug, Serialize)]
pub struct CombustibleShare {
    pub nombre: String,
    /// Porcentaje del total de litros de la ventana, en [0, 100]
    pub valor: f64,
    pub litros: f64,
}

#[derive(Debug, Serialize)]
pub struct MatriculaRanking {
    pub matricula: String,
    pub cargas: i64,
    pub litros: f64,
}

// ---------------------------------------------------------------------------
// Payload del dashboard de plataforma (solo admin)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PlatformDashboard {
    /// Ausente en modo histórico (sin cant_dias)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ventana: Option<Ventana>,
    pub kpis: PlatformKpis,
    pub empresas: Vec<EmpresaResumen>,
    pub resumen: ResumenUso,
}

#[derive(Debug, Serialize)]
pub struct Ventana {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct PlatformKpis {
    pub total_empresas: i64,
    pub empresas_activas: i64,
    pub empresas_inactivas: i64,
    pub total_usuarios: i64,
    pub usuarios_activos: i64,
    pub usuarios_inactivos: i64,
    pub total_matriculas: i64,
    /// Acotado a la ventana cuando la hay, histórico en caso contrario
    pub total_cargas: i64,
    pub empresas_con_cargas: i64,
}

#[derive(Debug, Serialize)]
pub struct EmpresaResumen {
    pub id: Uuid,
    pub nombre_comercial: String,
    pub ruc: String,
    pub activo: bool,
    pub usuarios: UsuariosEmpresa,
    pub matriculas: i64,
    pub cargas: i64,
    pub monto_total: f64,
    pub ultima_carga: Option<NaiveDate>,
    pub dias_sin_cargas: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UsuariosEmpresa {
    pub total: i64,
    pub activos: i64,
    pub inactivos: i64,
    pub porcentaje_actividad: f64,
}

#[derive(Debug, Serialize)]
pub struct ResumenUso {
    pub tasa_actividad_empresas: f64,
    pub tasa_actividad_usuarios: f64,
    pub promedio_usuarios_por_empresa: f64,
    pub promedio_matriculas_por_empresa: f64,
    pub promedio_cargas_por_empresa_activa: f64,
    /// Solo en modo ventana: empresas creadas dentro de la ventana
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresas_creadas_periodo: Option<i64>,
    /// Solo en modo ventana: empresas con cargas en la ventana anterior
    /// pero sin cargas en la actual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresas_inactivadas_periodo: Option<i64>,
}
