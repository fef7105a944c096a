//! Modelos de Venta y VentaLinea
//!
//! Una venta es un evento de compra inmutable empujado por la red de
//! estaciones; sus líneas de producto se borran en cascada con la venta.
//! El total de la venta y los subtotales de las líneas son hechos
//! independientes: nunca se reconcilian entre sí.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Venta principal - mapea exactamente a la tabla ventas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venta {
    pub id: Uuid,
    pub empresa_id: Option<Uuid>,
    pub matricula_id: Option<Uuid>,
    pub tipo: Option<String>,
    pub identificador_tr: Option<String>,
    pub ticket: Option<String>,
    pub fecha: Option<DateTime<Utc>>,
    pub codigo_cliente: Option<String>,
    pub ruc_cliente: Option<String>,
    pub nombre_cliente: Option<String>,
    pub codigo_estacion: Option<String>,
    pub nombre_estacion: Option<String>,
    pub codigo_moneda: Option<String>,
    pub total: Option<Decimal>,
    pub documento_chofer: Option<String>,
    pub nombre_chofer: Option<String>,
    pub matricula: Option<String>,
    pub kilometraje: Option<Decimal>,
    pub tarjeta: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Línea de producto de una venta - mapea a la tabla venta_lineas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VentaLinea {
    pub id: Uuid,
    pub venta_id: Uuid,
    pub codigo_producto: Option<String>,
    pub nombre_producto: Option<String>,
    pub precio_unitario: Option<Decimal>,
    pub cantidad: Option<Decimal>,
    pub subtotal: Option<Decimal>,
}

/// Subtotal de una línea: precio x cantidad, propagando nulos
pub fn calcular_subtotal(
    precio_unitario: Option<Decimal>,
    cantidad: Option<Decimal>,
) -> Option<Decimal> {
    match (precio_unitario, cantidad) {
        (Some(precio), Some(cantidad)) => Some(precio * cantidad),
        _ => None,
    }
}

/// Request del endpoint de ingesta /registrar (formato de la red de estaciones)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarVentaRequest {
    pub tipo: Option<String>,
    pub identificador_tr: Option<String>,
    pub ticket: Option<String>,
    pub fecha: Option<String>,
    pub codigo_cliente: Option<String>,
    pub ruc: Option<String>,
    pub nombre_cliente: Option<String>,
    pub codigo_estacion: Option<String>,
    pub nombre_estacion: Option<String>,
    pub codigo_moneda: Option<String>,
    #[serde(default)]
    pub lineas: Vec<RegistrarLineaRequest>,
    pub total: Option<Decimal>,
    pub documento_chofer: Option<String>,
    pub nombre_chofer: Option<String>,
    pub matricula: Option<String>,
    pub kilometraje: Option<Decimal>,
    pub tarjeta: Option<String>,
}

/// Línea de venta en el request de ingesta
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarLineaRequest {
    pub codigo_producto: Option<String>,
    pub nombre_producto: Option<String>,
    pub precio_unitario: Option<Decimal>,
    pub cantidad: Option<Decimal>,
}

/// Parsear la fecha en el formato de la red ('yyyy-MM-dd HH:mm:ss');
/// un valor no parseable se descarta en lugar de rechazar la venta
pub fn parse_fecha_venta(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .map(|dt| dt.and_utc())
}

/// Response de venta registrada
#[derive(Debug, Serialize)]
pub struct RegistrarVentaResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal de prueba")
    }

    #[test]
    fn subtotal_multiplica_precio_por_cantidad() {
        assert_eq!(
            calcular_subtotal(Some(dec("1.50")), Some(dec("20"))),
            Some(dec("30.00"))
        );
    }

    #[test]
    fn subtotal_propaga_nulos() {
        assert_eq!(calcular_subtotal(None, Some(dec("20"))), None);
        assert_eq!(calcular_subtotal(Some(dec("1.50")), None), None);
        assert_eq!(calcular_subtotal(None, None), None);
    }

    #[test]
    fn parse_fecha_formato_de_la_red() {
        let fecha = parse_fecha_venta(Some("2026-08-28 14:30:00")).expect("fecha válida");
        assert_eq!(fecha.date_naive(), chrono::NaiveDate::from_ymd_opt(2026, 8, 28).unwrap());
    }

    #[test]
    fn parse_fecha_invalida_se_descarta() {
        assert_eq!(parse_fecha_venta(Some("28/08/2026")), None);
        assert_eq!(parse_fecha_venta(None), None);
    }

    #[test]
    fn request_de_ingesta_usa_camel_case() {
        let body = serde_json::json!({
            "tipo": "VT",
            "identificadorTr": "TR-001",
            "ticket": "0001234",
            "fecha": "2026-08-28 10:00:00",
            "ruc": "80012345-6",
            "nombreCliente": "Transportes del Sur",
            "codigoEstacion": "E042",
            "nombreEstacion": "Estación Centro",
            "lineas": [
                { "codigoProducto": "D01", "nombreProducto": "Diesel", "precioUnitario": 1.25, "cantidad": 40.0 }
            ],
            "total": 50.0,
            "matricula": "AB123CD"
        });

        let request: RegistrarVentaRequest =
            serde_json::from_value(body).expect("el body debe deserializar");
        assert_eq!(request.identificador_tr.as_deref(), Some("TR-001"));
        assert_eq!(request.lineas.len(), 1);
        assert_eq!(request.lineas[0].codigo_producto.as_deref(), Some("D01"));
    }
}
