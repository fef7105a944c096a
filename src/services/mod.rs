//! Motor de agregación de analytics
//!
//! Cada invocación es un cómputo puro de solo lectura sobre filas obtenidas
//! del Entity Store: sin estado mutable propio, paralelizable por request.

pub mod company_dashboard;
pub mod platform_dashboard;
pub mod window;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// Redondear a 2 decimales (redondeo bancario) y convertir a número JSON
pub(crate) fn round2(valor: Decimal) -> f64 {
    valor.round_dp(2).to_f64().unwrap_or(0.0)
}

/// Ratio a / b redondeado a 2 decimales, 0 cuando el divisor es 0
pub(crate) fn ratio2(numerador: Decimal, divisor: i64) -> f64 {
    if divisor > 0 {
        round2(numerador / Decimal::from(divisor))
    } else {
        0.0
    }
}

/// Porcentaje a / b * 100 redondeado a 2 decimales, 0 cuando el divisor es 0
pub(crate) fn porcentaje2(numerador: i64, divisor: i64) -> f64 {
    if divisor > 0 {
        round2(Decimal::from(numerador * 100) / Decimal::from(divisor))
    } else {
        0.0
    }
}
