//! Agregador de rollup de plataforma
//!
//! Computa los KPIs de sistema, la tabla por empresa y el resumen de uso,
//! en una de dos políticas seleccionadas por la presencia de cant_dias:
//! histórico (sin ventana) o acotado a ventana. En modo ventana el resumen
//! agrega además los deltas de periodo (empresas creadas y empresas que
//! dejaron de cargar respecto de la ventana anterior).

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::dashboard::{
    EmpresaResumen, EmpresaStatRow, PlatformDashboard, PlatformKpis, ResumenUso, UsuariosEmpresa,
    Ventana,
};
use crate::services::{porcentaje2, ratio2, round2, window::ReportWindow};

pub fn build_platform_dashboard(
    window: Option<&ReportWindow>,
    empresas: &[EmpresaStatRow],
    usuarios_plataforma: (i64, i64),
    activas_ventana_previa: &HashSet<Uuid>,
    referencia: NaiveDate,
) -> PlatformDashboard {
    let fin = window.map(|w| w.fecha_fin).unwrap_or(referencia);

    let total_empresas = empresas.len() as i64;
    let empresas_activas = empresas.iter().filter(|e| e.activo).count() as i64;
    // Conteo de plataforma completa: los admins sin empresa también cuentan,
    // por eso no se suma la columna por empresa
    let (total_usuarios, usuarios_activos) = usuarios_plataforma;
    let total_matriculas: i64 = empresas.iter().map(|e| e.matriculas).sum();
    let total_cargas: i64 = empresas.iter().map(|e| e.cargas).sum();
    let empresas_con_cargas = empresas.iter().filter(|e| e.cargas > 0).count() as i64;

    let tabla: Vec<EmpresaResumen> = empresas
        .iter()
        .map(|empresa| EmpresaResumen {
            id: empresa.id,
            nombre_comercial: empresa.nombre_comercial.clone(),
            ruc: empresa.ruc.clone(),
            activo: empresa.activo,
            usuarios: UsuariosEmpresa {
                total: empresa.usuarios_total,
                activos: empresa.usuarios_activos,
                inactivos: empresa.usuarios_total - empresa.usuarios_activos,
                porcentaje_actividad: porcentaje2(empresa.usuarios_activos, empresa.usuarios_total),
            },
            matriculas: empresa.matriculas,
            cargas: empresa.cargas,
            monto_total: round2(empresa.monto_total.unwrap_or(Decimal::ZERO)),
            ultima_carga: empresa.ultima_carga,
            dias_sin_cargas: empresa
                .ultima_carga
                .map(|ultima| (fin - ultima).num_days()),
        })
        .collect();

    let deltas = window.map(|w| deltas_de_periodo(w, empresas, activas_ventana_previa));

    PlatformDashboard {
        ventana: window.and_then(|w| {
            w.fecha_inicio.map(|inicio| Ventana {
                fecha_inicio: inicio,
                fecha_fin: w.fecha_fin,
            })
        }),
        kpis: PlatformKpis {
            total_empresas,
            empresas_activas,
            empresas_inactivas: total_empresas - empresas_activas,
            total_usuarios,
            usuarios_activos,
            usuarios_inactivos: total_usuarios - usuarios_activos,
            total_matriculas,
            total_cargas,
            empresas_con_cargas,
        },
        empresas: tabla,
        resumen: ResumenUso {
            tasa_actividad_empresas: porcentaje2(empresas_con_cargas, total_empresas),
            tasa_actividad_usuarios: porcentaje2(usuarios_activos, total_usuarios),
            promedio_usuarios_por_empresa: ratio2(Decimal::from(total_usuarios), total_empresas),
            promedio_matriculas_por_empresa: ratio2(
                Decimal::from(total_matriculas),
                total_empresas,
            ),
            promedio_cargas_por_empresa_activa: ratio2(
                Decimal::from(total_cargas),
                empresas_con_cargas,
            ),
            empresas_creadas_periodo: deltas.map(|d| d.0),
            empresas_inactivadas_periodo: deltas.map(|d| d.1),
        },
    }
}

/// (empresas creadas en la ventana, empresas activas en la ventana anterior
/// pero sin cargas en la actual)
fn deltas_de_periodo(
    window: &ReportWindow,
    empresas: &[EmpresaStatRow],
    activas_ventana_previa: &HashSet<Uuid>,
) -> (i64, i64) {
    let creadas = empresas
        .iter()
        .filter(|e| window.contains(e.created_at.date_naive()))
        .count() as i64;

    let activas_actuales: HashSet<Uuid> = empresas
        .iter()
        .filter(|e| e.cargas > 0)
        .map(|e| e.id)
        .collect();
    let inactivadas = activas_ventana_previa
        .difference(&activas_actuales)
        .count() as i64;

    (creadas, inactivadas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fecha(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).expect("fecha de prueba válida")
    }

    fn empresa(
        nombre: &str,
        cargas: i64,
        usuarios_total: i64,
        usuarios_activos: i64,
        creada_dia: u32,
    ) -> EmpresaStatRow {
        EmpresaStatRow {
            id: Uuid::new_v4(),
            nombre_comercial: nombre.to_string(),
            ruc: format!("80-{}", nombre),
            activo: true,
            created_at: Utc
                .with_ymd_and_hms(2026, 8, creada_dia, 12, 0, 0)
                .single()
                .expect("timestamp de prueba válido"),
            usuarios_total,
            usuarios_activos,
            matriculas: 2,
            cargas,
            monto_total: Some("150.00".parse().expect("decimal de prueba")),
            ultima_carga: if cargas > 0 { Some(fecha(26)) } else { None },
        }
    }

    /// Conteo de plataforma equivalente a sumar las columnas por empresa
    /// (sin admins fuera de empresa)
    fn usuarios_de(empresas: &[EmpresaStatRow]) -> (i64, i64) {
        (
            empresas.iter().map(|e| e.usuarios_total).sum(),
            empresas.iter().map(|e| e.usuarios_activos).sum(),
        )
    }

    #[test]
    fn delta_de_empresas_inactivadas_es_la_diferencia_de_conjuntos() {
        // 5 empresas, 3 activas en la ventana actual, 4 en la anterior;
        // la empresa X estuvo activa antes pero no ahora
        let window = ReportWindow::resolve(Some(7), fecha(28));
        let empresas = vec![
            empresa("A", 3, 2, 2, 1),
            empresa("B", 1, 2, 2, 1),
            empresa("C", 2, 2, 2, 1),
            empresa("X", 0, 2, 2, 1),
            empresa("E", 0, 2, 2, 1),
        ];

        let mut previas: HashSet<Uuid> = empresas[..3].iter().map(|e| e.id).collect();
        previas.insert(empresas[3].id); // X activa en la ventana anterior

        let dashboard = build_platform_dashboard(
            Some(&window),
            &empresas,
            usuarios_de(&empresas),
            &previas,
            fecha(28),
        );

        assert_eq!(dashboard.resumen.empresas_inactivadas_periodo, Some(1));
        assert_eq!(dashboard.kpis.empresas_con_cargas, 3);
    }

    #[test]
    fn empresas_creadas_en_la_ventana() {
        let window = ReportWindow::resolve(Some(7), fecha(28));
        let empresas = vec![
            empresa("vieja", 1, 1, 1, 1),   // fuera de la ventana [22, 28]
            empresa("nueva1", 0, 1, 1, 23), // dentro
            empresa("nueva2", 2, 1, 1, 28), // dentro
        ];

        let dashboard = build_platform_dashboard(
            Some(&window),
            &empresas,
            usuarios_de(&empresas),
            &HashSet::new(),
            fecha(28),
        );

        assert_eq!(dashboard.resumen.empresas_creadas_periodo, Some(2));
    }

    #[test]
    fn modo_historico_omite_deltas_y_ventana() {
        let empresas = vec![empresa("A", 3, 2, 1, 1)];
        let dashboard = build_platform_dashboard(
            None,
            &empresas,
            usuarios_de(&empresas),
            &HashSet::new(),
            fecha(28),
        );

        assert!(dashboard.ventana.is_none());
        assert_eq!(dashboard.resumen.empresas_creadas_periodo, None);
        assert_eq!(dashboard.resumen.empresas_inactivadas_periodo, None);
        assert_eq!(dashboard.kpis.total_cargas, 3);
    }

    #[test]
    fn ratios_con_plataforma_vacia_no_dividen_por_cero() {
        let dashboard = build_platform_dashboard(
            None,
            &[],
            (0, 0),
            &HashSet::new(),
            fecha(28),
        );

        assert_eq!(dashboard.kpis.total_empresas, 0);
        assert_eq!(dashboard.resumen.tasa_actividad_empresas, 0.0);
        assert_eq!(dashboard.resumen.tasa_actividad_usuarios, 0.0);
        assert_eq!(dashboard.resumen.promedio_usuarios_por_empresa, 0.0);
        assert_eq!(dashboard.resumen.promedio_cargas_por_empresa_activa, 0.0);
    }

    #[test]
    fn kpis_inactivos_se_derivan_por_resta() {
        let mut inactiva = empresa("B", 0, 3, 1, 1);
        inactiva.activo = false;
        let empresas = vec![empresa("A", 2, 3, 3, 1), inactiva];

        let dashboard = build_platform_dashboard(
            None,
            &empresas,
            usuarios_de(&empresas),
            &HashSet::new(),
            fecha(28),
        );

        assert_eq!(dashboard.kpis.total_empresas, 2);
        assert_eq!(dashboard.kpis.empresas_activas, 1);
        assert_eq!(dashboard.kpis.empresas_inactivas, 1);
        assert_eq!(dashboard.kpis.total_usuarios, 6);
        assert_eq!(dashboard.kpis.usuarios_activos, 4);
        assert_eq!(dashboard.kpis.usuarios_inactivos, 2);
    }

    #[test]
    fn dias_sin_cargas_contra_el_fin_de_ventana() {
        let window = ReportWindow::resolve(Some(7), fecha(28));
        let empresas = vec![empresa("A", 1, 1, 1, 1), empresa("B", 0, 1, 1, 1)];

        let dashboard = build_platform_dashboard(
            Some(&window),
            &empresas,
            usuarios_de(&empresas),
            &HashSet::new(),
            fecha(28),
        );

        // última carga el 26, fin de ventana el 28
        assert_eq!(dashboard.empresas[0].dias_sin_cargas, Some(2));
        // sin cargas de por vida: ambos campos nulos
        assert_eq!(dashboard.empresas[1].ultima_carga, None);
        assert_eq!(dashboard.empresas[1].dias_sin_cargas, None);
    }

    #[test]
    fn porcentaje_de_actividad_de_usuarios_por_empresa() {
        let empresas = vec![empresa("A", 0, 4, 3, 1), empresa("B", 0, 0, 0, 1)];
        let dashboard = build_platform_dashboard(
            None,
            &empresas,
            usuarios_de(&empresas),
            &HashSet::new(),
            fecha(28),
        );

        assert_eq!(dashboard.empresas[0].usuarios.porcentaje_actividad, 75.0);
        // sin usuarios: el guard evita la división por cero
        assert_eq!(dashboard.empresas[1].usuarios.porcentaje_actividad, 0.0);
    }

    #[test]
    fn admins_sin_empresa_cuentan_en_los_kpis_de_usuarios() {
        // dos usuarios de empresa, más un admin de plataforma (empresa nula)
        // que solo aparece en el conteo global
        let empresas = vec![empresa("A", 0, 2, 1, 1)];
        let dashboard =
            build_platform_dashboard(None, &empresas, (3, 2), &HashSet::new(), fecha(28));

        assert_eq!(dashboard.kpis.total_usuarios, 3);
        assert_eq!(dashboard.kpis.usuarios_activos, 2);
        assert_eq!(dashboard.kpis.usuarios_inactivos, 1);
        assert_eq!(dashboard.resumen.tasa_actividad_usuarios, 66.67);
        assert_eq!(dashboard.resumen.promedio_usuarios_por_empresa, 3.0);
        // la tabla por empresa conserva el conteo propio de la empresa
        assert_eq!(dashboard.empresas[0].usuarios.total, 2);
    }
}
