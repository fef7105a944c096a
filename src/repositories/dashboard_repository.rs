//! Lecturas del Entity Store para el motor de dashboards
//!
//! Proyecciones de solo lectura filtradas por empresa y/o ventana de fechas.
//! Las ventas sin fecha quedan fuera de toda ventana acotada; en modo
//! histórico cuentan igual que el resto.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::dashboard::{DetalleAgregadoRow, EmpresaStatRow, VentaAgregadaRow};
use crate::services::window::ReportWindow;
use crate::utils::errors::AppError;

pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ventas de una empresa dentro de la ventana, proyectadas para agregar
    pub async fn ventas_empresa(
        &self,
        empresa_id: Uuid,
        window: &ReportWindow,
    ) -> Result<Vec<VentaAgregadaRow>, AppError> {
        let result = sqlx::query_as::<_, VentaAgregadaRow>(
            r#"
            SELECT
                (fecha AT TIME ZONE 'UTC')::date AS fecha,
                codigo_estacion,
                nombre_estacion,
                matricula,
                total
            FROM ventas
            WHERE empresa_id = $1
              AND ($2::date IS NULL OR (fecha AT TIME ZONE 'UTC')::date >= $2)
              AND (fecha AT TIME ZONE 'UTC')::date <= $3
            ORDER BY fecha
            "#,
        )
        .bind(empresa_id)
        .bind(window.fecha_inicio)
        .bind(window.fecha_fin)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Hechos de la vista venta_detalles para la misma empresa y ventana
    pub async fn detalles_empresa(
        &self,
        empresa_id: Uuid,
        window: &ReportWindow,
    ) -> Result<Vec<DetalleAgregadoRow>, AppError> {
        let result = sqlx::query_as::<_, DetalleAgregadoRow>(
            r#"
            SELECT
                (fecha AT TIME ZONE 'UTC')::date AS fecha,
                nombre_producto,
                matricula,
                cantidad,
                subtotal
            FROM venta_detalles
            WHERE empresa_id = $1
              AND ($2::date IS NULL OR (fecha AT TIME ZONE 'UTC')::date >= $2)
              AND (fecha AT TIME ZONE 'UTC')::date <= $3
            ORDER BY fecha
            "#,
        )
        .bind(empresa_id)
        .bind(window.fecha_inicio)
        .bind(window.fecha_fin)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Total de matrículas de la empresa, de por vida (nunca por ventana)
    pub async fn total_matriculas(&self, empresa_id: Uuid) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM matriculas WHERE empresa_id = $1")
                .bind(empresa_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Usuarios de toda la plataforma (total, activos), incluidos los
    /// administradores sin empresa
    pub async fn conteo_usuarios(&self) -> Result<(i64, i64), AppError> {
        let result: (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE activo) FROM users")
                .fetch_one(&self.pool)
                .await?;

        Ok(result)
    }

    /// Estadísticas por empresa para el rollup de plataforma. Con ventana,
    /// cargas y monto quedan acotados a ella; sin ventana son históricos.
    /// ultima_carga es siempre la venta más reciente de la vida de la empresa.
    pub async fn estadisticas_empresas(
        &self,
        window: Option<&ReportWindow>,
    ) -> Result<Vec<EmpresaStatRow>, AppError> {
        let fecha_inicio = window.and_then(|w| w.fecha_inicio);
        let fecha_fin = window.map(|w| w.fecha_fin);

        let result = sqlx::query_as::<_, EmpresaStatRow>(
            r#"
            SELECT
                e.id,
                e.nombre_comercial,
                e.ruc,
                e.activo,
                e.created_at,
                (SELECT COUNT(*) FROM users u WHERE u.empresa_id = e.id) AS usuarios_total,
                (SELECT COUNT(*) FROM users u WHERE u.empresa_id = e.id AND u.activo) AS usuarios_activos,
                (SELECT COUNT(*) FROM matriculas m WHERE m.empresa_id = e.id) AS matriculas,
                (SELECT COUNT(*) FROM ventas v
                  WHERE v.empresa_id = e.id
                    AND ($1::date IS NULL OR (v.fecha AT TIME ZONE 'UTC')::date >= $1)
                    AND ($2::date IS NULL OR (v.fecha AT TIME ZONE 'UTC')::date <= $2)) AS cargas,
                (SELECT SUM(v.total) FROM ventas v
                  WHERE v.empresa_id = e.id
                    AND ($1::date IS NULL OR (v.fecha AT TIME ZONE 'UTC')::date >= $1)
                    AND ($2::date IS NULL OR (v.fecha AT TIME ZONE 'UTC')::date <= $2)) AS monto_total,
                (SELECT MAX((v.fecha AT TIME ZONE 'UTC')::date) FROM ventas v
                  WHERE v.empresa_id = e.id) AS ultima_carga
            FROM empresas e
            ORDER BY e.nombre_comercial
            "#,
        )
        .bind(fecha_inicio)
        .bind(fecha_fin)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Ids de empresas con al menos una carga dentro de la ventana
    pub async fn empresas_con_cargas(
        &self,
        window: &ReportWindow,
    ) -> Result<Vec<Uuid>, AppError> {
        let result: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT empresa_id FROM ventas
            WHERE empresa_id IS NOT NULL
              AND ($1::date IS NULL OR (fecha AT TIME ZONE 'UTC')::date >= $1)
              AND (fecha AT TIME ZONE 'UTC')::date <= $2
            "#,
        )
        .bind(window.fecha_inicio)
        .bind(window.fecha_fin)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }
}
