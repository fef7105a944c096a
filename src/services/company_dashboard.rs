//! Agregador de métricas por empresa
//!
//! Computa el payload del dashboard de una empresa para una ventana resuelta.
//! Opera en memoria sobre las filas que el repositorio ya filtró por empresa
//! y rango de fechas; una empresa inexistente produce el payload en cero de
//! forma deliberada (el filtro vacío no es un error).

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::dashboard::{
    CombustibleShare, CompanyDashboard, DetalleAgregadoRow, Encabezados, EstacionRanking,
    Indicadores, MatriculaRanking, VentaAgregadaRow, VentaDiaria,
};
use crate::services::{ratio2, round2, window::ReportWindow};

/// Tamaño máximo de los rankings top_estaciones y top_matriculas
const TOP_N: usize = 8;

pub fn build_company_dashboard(
    window: &ReportWindow,
    ventas: &[VentaAgregadaRow],
    detalles: &[DetalleAgregadoRow],
    total_matriculas: i64,
) -> CompanyDashboard {
    let total_cargas = ventas.len() as i64;
    let total_venta: Decimal = ventas.iter().filter_map(|v| v.total).sum();
    let litros_totales: Decimal = detalles.iter().filter_map(|d| d.cantidad).sum();

    CompanyDashboard {
        fecha_inicio: window.fecha_inicio.unwrap_or(window.fecha_fin),
        fecha_fin: window.fecha_fin,
        encabezados: Encabezados {
            total_cargas,
            total_venta: round2(total_venta),
            litros_totales: round2(litros_totales),
            total_matriculas,
        },
        ventas_por_periodo: serie_diaria(detalles),
        indicadores: Indicadores {
            ticket_promedio: ratio2(total_venta, total_cargas),
            litros_por_carga: ratio2(litros_totales, total_cargas),
            estaciones: distinct_estaciones(ventas),
            matriculas: distinct_matriculas(ventas),
        },
        top_estaciones: top_estaciones(ventas),
        combustibles: combustibles(detalles, litros_totales),
        top_matriculas: top_matriculas(ventas, detalles),
    }
}

/// Un punto por fecha con actividad, ascendente; las fechas sin hechos se
/// omiten, no se rellenan con cero
fn serie_diaria(detalles: &[DetalleAgregadoRow]) -> Vec<VentaDiaria> {
    let mut por_dia: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for detalle in detalles {
        let acumulado = por_dia
            .entry(detalle.fecha)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        acumulado.0 += detalle.cantidad.unwrap_or(Decimal::ZERO);
        acumulado.1 += detalle.subtotal.unwrap_or(Decimal::ZERO);
    }

    por_dia
        .into_iter()
        .map(|(fecha, (litros, monto))| VentaDiaria {
            fecha,
            litros: round2(litros),
            monto: round2(monto),
        })
        .collect()
}

fn distinct_estaciones(ventas: &[VentaAgregadaRow]) -> i64 {
    ventas
        .iter()
        .filter_map(|v| v.codigo_estacion.as_deref())
        .collect::<HashSet<_>>()
        .len() as i64
}

fn distinct_matriculas(ventas: &[VentaAgregadaRow]) -> i64 {
    ventas
        .iter()
        .filter_map(|v| v.matricula.as_deref())
        .collect::<HashSet<_>>()
        .len() as i64
}

/// Agrupar por estación, ordenar por cargas descendente (empates en orden de
/// primera aparición) y truncar a TOP_N
fn top_estaciones(ventas: &[VentaAgregadaRow]) -> Vec<EstacionRanking> {
    struct Acumulado {
        estacion: String,
        cargas: i64,
        monto: Decimal,
    }

    let mut grupos: Vec<Acumulado> = Vec::new();
    let mut indice: HashMap<String, usize> = HashMap::new();

    for venta in ventas {
        // Ventas sin estación quedan fuera del ranking, igual que fuera del
        // conteo de estaciones distintas
        let Some(codigo) = venta.codigo_estacion.as_deref() else {
            continue;
        };
        let pos = *indice.entry(codigo.to_string()).or_insert_with(|| {
            grupos.push(Acumulado {
                estacion: venta
                    .nombre_estacion
                    .clone()
                    .unwrap_or_else(|| codigo.to_string()),
                cargas: 0,
                monto: Decimal::ZERO,
            });
            grupos.len() - 1
        });
        grupos[pos].cargas += 1;
        grupos[pos].monto += venta.total.unwrap_or(Decimal::ZERO);
    }

    // sort estable: los empates conservan el orden de inserción
    grupos.sort_by(|a, b| b.cargas.cmp(&a.cargas));
    grupos.truncate(TOP_N);

    grupos
        .into_iter()
        .map(|g| EstacionRanking {
            estacion: g.estacion,
            cargas: g.cargas,
            monto: round2(g.monto),
        })
        .collect()
}

/// Litros por producto con porcentaje del total, descendente por litros.
/// Sin truncar: la lista de productos es corta por naturaleza.
fn combustibles(detalles: &[DetalleAgregadoRow], litros_totales: Decimal) -> Vec<CombustibleShare> {
    let mut grupos: Vec<(String, Decimal)> = Vec::new();
    let mut indice: HashMap<String, usize> = HashMap::new();

    for detalle in detalles {
        let nombre = detalle
            .nombre_producto
            .clone()
            .unwrap_or_else(|| "Sin nombre".to_string());
        let pos = *indice.entry(nombre.clone()).or_insert_with(|| {
            grupos.push((nombre, Decimal::ZERO));
            grupos.len() - 1
        });
        grupos[pos].1 += detalle.cantidad.unwrap_or(Decimal::ZERO);
    }

    grupos.sort_by(|a, b| b.1.cmp(&a.1));

    grupos
        .into_iter()
        .map(|(nombre, litros)| {
            let valor = if litros_totales > Decimal::ZERO {
                round2(litros / litros_totales * Decimal::from(100))
            } else {
                0.0
            };
            CombustibleShare {
                nombre,
                valor,
                litros: round2(litros),
            }
        })
        .collect()
}

/// Matrículas con más cargas en la ventana. Los litros de cada matrícula se
/// recomputan en una segunda pasada sobre los hechos de la misma ventana.
fn top_matriculas(
    ventas: &[VentaAgregadaRow],
    detalles: &[DetalleAgregadoRow],
) -> Vec<MatriculaRanking> {
    let mut grupos: Vec<(String, i64)> = Vec::new();
    let mut indice: HashMap<String, usize> = HashMap::new();

    for venta in ventas {
        let Some(matricula) = venta.matricula.as_deref() else {
            continue;
        };
        let pos = *indice.entry(matricula.to_string()).or_insert_with(|| {
            grupos.push((matricula.to_string(), 0));
            grupos.len() - 1
        });
        grupos[pos].1 += 1;
    }

    grupos.sort_by(|a, b| b.1.cmp(&a.1));
    grupos.truncate(TOP_N);

    grupos
        .into_iter()
        .map(|(matricula, cargas)| {
            let litros: Decimal = detalles
                .iter()
                .filter(|d| d.matricula.as_deref() == Some(matricula.as_str()))
                .filter_map(|d| d.cantidad)
                .sum();
            MatriculaRanking {
                matricula,
                cargas,
                litros: round2(litros),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).expect("fecha de prueba válida")
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal de prueba")
    }

    fn venta(dia: u32, estacion: &str, matricula: &str, total: &str) -> VentaAgregadaRow {
        VentaAgregadaRow {
            fecha: fecha(dia),
            codigo_estacion: Some(estacion.to_string()),
            nombre_estacion: Some(format!("Estación {}", estacion)),
            matricula: Some(matricula.to_string()),
            total: Some(dec(total)),
        }
    }

    fn detalle(dia: u32, producto: &str, matricula: &str, cantidad: &str, subtotal: &str) -> DetalleAgregadoRow {
        DetalleAgregadoRow {
            fecha: fecha(dia),
            nombre_producto: Some(producto.to_string()),
            matricula: Some(matricula.to_string()),
            cantidad: Some(dec(cantidad)),
            subtotal: Some(dec(subtotal)),
        }
    }

    fn ventana_7_dias() -> ReportWindow {
        ReportWindow::resolve(Some(7), fecha(28))
    }

    // Escenario de referencia: 3 cargas por 300.00 con volúmenes 10, 20 y 5
    // de dos productos A (10 + 5 = 15) y B (20)
    fn escenario_base() -> (Vec<VentaAgregadaRow>, Vec<DetalleAgregadoRow>) {
        let ventas = vec![
            venta(24, "E1", "AAA111", "100.00"),
            venta(26, "E2", "BBB222", "120.00"),
            venta(28, "E1", "AAA111", "80.00"),
        ];
        let detalles = vec![
            detalle(24, "A", "AAA111", "10", "100.00"),
            detalle(26, "B", "BBB222", "20", "120.00"),
            detalle(28, "A", "AAA111", "5", "80.00"),
        ];
        (ventas, detalles)
    }

    #[test]
    fn escenario_de_referencia() {
        let (ventas, detalles) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &detalles, 4);

        assert_eq!(dashboard.encabezados.total_cargas, 3);
        assert_eq!(dashboard.encabezados.total_venta, 300.00);
        assert_eq!(dashboard.encabezados.litros_totales, 35.0);
        assert_eq!(dashboard.encabezados.total_matriculas, 4);
        assert_eq!(dashboard.indicadores.ticket_promedio, 100.00);

        // combustibles descendente por litros, porcentajes del total
        assert_eq!(dashboard.combustibles.len(), 2);
        assert_eq!(dashboard.combustibles[0].nombre, "B");
        assert_eq!(dashboard.combustibles[0].litros, 20.0);
        assert_eq!(dashboard.combustibles[0].valor, 57.14);
        assert_eq!(dashboard.combustibles[1].nombre, "A");
        assert_eq!(dashboard.combustibles[1].litros, 15.0);
        assert_eq!(dashboard.combustibles[1].valor, 42.86);
    }

    #[test]
    fn empresa_sin_ventas_produce_payload_en_cero() {
        let dashboard = build_company_dashboard(&ventana_7_dias(), &[], &[], 0);

        assert_eq!(dashboard.encabezados.total_cargas, 0);
        assert_eq!(dashboard.encabezados.total_venta, 0.0);
        assert_eq!(dashboard.indicadores.ticket_promedio, 0.0);
        assert_eq!(dashboard.indicadores.litros_por_carga, 0.0);
        assert!(dashboard.ventas_por_periodo.is_empty());
        assert!(dashboard.top_estaciones.is_empty());
        assert!(dashboard.combustibles.is_empty());
        assert!(dashboard.top_matriculas.is_empty());
    }

    #[test]
    fn serie_diaria_ascendente_y_sin_dias_vacios() {
        let (_, detalles) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &[], &detalles, 0);

        let fechas: Vec<NaiveDate> = dashboard
            .ventas_por_periodo
            .iter()
            .map(|p| p.fecha)
            .collect();
        assert_eq!(fechas, vec![fecha(24), fecha(26), fecha(28)]);

        let suma_montos: f64 = dashboard.ventas_por_periodo.iter().map(|p| p.monto).sum();
        assert_eq!(suma_montos, 300.00);
    }

    #[test]
    fn suma_de_la_serie_no_supera_el_total() {
        let (ventas, detalles) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &detalles, 0);

        let suma: f64 = dashboard.ventas_por_periodo.iter().map(|p| p.monto).sum();
        assert!(suma <= dashboard.encabezados.total_venta + 0.01);
    }

    #[test]
    fn porcentajes_de_combustibles_suman_cien() {
        let (_, detalles) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &[], &detalles, 0);

        let suma: f64 = dashboard.combustibles.iter().map(|c| c.valor).sum();
        assert!((suma - 100.0).abs() <= 0.1);
        for combustible in &dashboard.combustibles {
            assert!(combustible.valor >= 0.0 && combustible.valor <= 100.0);
        }
    }

    #[test]
    fn top_estaciones_trunca_a_ocho_y_ordena_descendente() {
        let mut ventas = Vec::new();
        for estacion in 0..12 {
            // la estación i acumula i + 1 cargas
            for _ in 0..=estacion {
                ventas.push(venta(28, &format!("E{:02}", estacion), "AAA111", "10.00"));
            }
        }
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &[], 0);

        assert_eq!(dashboard.top_estaciones.len(), 8);
        assert_eq!(dashboard.top_estaciones[0].estacion, "Estación E11");
        assert_eq!(dashboard.top_estaciones[0].cargas, 12);
        for par in dashboard.top_estaciones.windows(2) {
            assert!(par[0].cargas >= par[1].cargas);
        }
    }

    #[test]
    fn empates_de_estaciones_conservan_orden_de_aparicion() {
        let ventas = vec![
            venta(24, "E9", "AAA111", "10.00"),
            venta(25, "E1", "AAA111", "10.00"),
            venta(26, "E5", "AAA111", "10.00"),
        ];
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &[], 0);

        let nombres: Vec<&str> = dashboard
            .top_estaciones
            .iter()
            .map(|e| e.estacion.as_str())
            .collect();
        assert_eq!(nombres, vec!["Estación E9", "Estación E1", "Estación E5"]);
    }

    #[test]
    fn top_matriculas_recomputa_litros_en_segunda_pasada() {
        let (ventas, detalles) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &detalles, 0);

        assert_eq!(dashboard.top_matriculas.len(), 2);
        assert_eq!(dashboard.top_matriculas[0].matricula, "AAA111");
        assert_eq!(dashboard.top_matriculas[0].cargas, 2);
        assert_eq!(dashboard.top_matriculas[0].litros, 15.0);
        assert_eq!(dashboard.top_matriculas[1].matricula, "BBB222");
        assert_eq!(dashboard.top_matriculas[1].cargas, 1);
        assert_eq!(dashboard.top_matriculas[1].litros, 20.0);
    }

    #[test]
    fn totales_nulos_cuentan_como_cero() {
        let ventas = vec![VentaAgregadaRow {
            fecha: fecha(28),
            codigo_estacion: None,
            nombre_estacion: None,
            matricula: None,
            total: None,
        }];
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &[], 0);

        assert_eq!(dashboard.encabezados.total_cargas, 1);
        assert_eq!(dashboard.encabezados.total_venta, 0.0);
        assert_eq!(dashboard.indicadores.estaciones, 0);
        assert_eq!(dashboard.indicadores.matriculas, 0);
        assert!(dashboard.top_matriculas.is_empty());
    }

    #[test]
    fn ventas_sin_estacion_quedan_fuera_del_ranking() {
        let mut ventas = vec![venta(28, "E1", "AAA111", "50.00")];
        ventas.push(VentaAgregadaRow {
            fecha: fecha(28),
            codigo_estacion: None,
            nombre_estacion: Some("Estación sin código".to_string()),
            matricula: Some("AAA111".to_string()),
            total: Some(dec("30.00")),
        });
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &[], 0);

        // el ranking y el conteo de estaciones distintas ven lo mismo
        assert_eq!(dashboard.top_estaciones.len(), 1);
        assert_eq!(dashboard.indicadores.estaciones, 1);
        assert_eq!(dashboard.top_estaciones[0].estacion, "Estación E1");
        assert_eq!(dashboard.top_estaciones[0].cargas, 1);
        // la venta sin estación sigue contando en los encabezados
        assert_eq!(dashboard.encabezados.total_cargas, 2);
        assert_eq!(dashboard.encabezados.total_venta, 80.00);
    }

    #[test]
    fn indicadores_distinct_cuentan_valores_unicos() {
        let (ventas, _) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &[], 0);

        assert_eq!(dashboard.indicadores.estaciones, 2);
        assert_eq!(dashboard.indicadores.matriculas, 2);
    }

    #[test]
    fn litros_por_carga_redondeado_a_dos_decimales() {
        let (ventas, detalles) = escenario_base();
        let dashboard = build_company_dashboard(&ventana_7_dias(), &ventas, &detalles, 0);

        // 35 litros / 3 cargas = 11.666...
        assert_eq!(dashboard.indicadores.litros_por_carga, 11.67);
    }
}
