//! Resolución de ventanas de reporte
//!
//! Convierte el parámetro cant_dias (o su ausencia, que significa "todo el
//! histórico") en un rango inclusivo de fechas calendario anclado en "hoy".

use chrono::{Duration, NaiveDate};

use crate::utils::errors::AppError;

/// Máximo de días hacia atrás que acepta un reporte acotado (100 años).
/// Cualquier consulta más larga que esto equivale al modo histórico.
pub const MAX_CANT_DIAS: i64 = 36_500;

/// Ventana inclusiva de fechas calendario para filtrar datos transaccionales.
/// `fecha_inicio` en None significa ventana sin límite izquierdo (histórico).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: NaiveDate,
    lookback: Option<i64>,
}

impl ReportWindow {
    /// Resolver una ventana a partir de cant_dias y la fecha de referencia.
    /// Con cant_dias = n la ventana cubre exactamente n días calendario
    /// incluyendo la referencia: [referencia - (n - 1), referencia].
    pub fn resolve(cant_dias: Option<i64>, referencia: NaiveDate) -> Self {
        match cant_dias {
            // checked_sub_signed satura en la fecha mínima representable en
            // lugar de entrar en pánico con un lookback desmesurado
            Some(dias) => Self {
                fecha_inicio: Some(
                    referencia
                        .checked_sub_signed(Duration::days(dias - 1))
                        .unwrap_or(NaiveDate::MIN),
                ),
                fecha_fin: referencia,
                lookback: Some(dias),
            },
            None => Self {
                fecha_inicio: None,
                fecha_fin: referencia,
                lookback: None,
            },
        }
    }

    /// Ventana inmediatamente anterior, de la misma longitud.
    /// Solo definida para ventanas acotadas.
    pub fn previous(&self) -> Option<Self> {
        let dias = self.lookback?;
        let inicio = self.fecha_inicio?;
        let prev_fin = inicio.checked_sub_signed(Duration::days(1))?;
        Some(Self {
            fecha_inicio: Some(
                prev_fin
                    .checked_sub_signed(Duration::days(dias - 1))
                    .unwrap_or(NaiveDate::MIN),
            ),
            fecha_fin: prev_fin,
            lookback: Some(dias),
        })
    }

    pub fn contains(&self, fecha: NaiveDate) -> bool {
        let dentro_inicio = match self.fecha_inicio {
            Some(inicio) => fecha >= inicio,
            None => true,
        };
        dentro_inicio && fecha <= self.fecha_fin
    }
}

/// Parsear el query param cant_dias. Ausente es válido (histórico); presente
/// debe ser un entero positivo, si no la request se rechaza sin computar nada.
pub fn parse_cant_dias(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw {
        None => Ok(None),
        Some(valor) => {
            let dias: i64 = valor.trim().parse().map_err(|_| {
                AppError::BadRequest("cant_dias debe ser un número entero".to_string())
            })?;
            if dias < 1 {
                return Err(AppError::BadRequest(
                    "cant_dias debe ser un entero positivo".to_string(),
                ));
            }
            if dias > MAX_CANT_DIAS {
                return Err(AppError::BadRequest(format!(
                    "cant_dias no puede superar {}",
                    MAX_CANT_DIAS
                )));
            }
            Ok(Some(dias))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("fecha de prueba válida")
    }

    #[test]
    fn ventana_de_7_dias_incluye_la_referencia() {
        let window = ReportWindow::resolve(Some(7), fecha(2026, 8, 28));
        assert_eq!(window.fecha_inicio, Some(fecha(2026, 8, 22)));
        assert_eq!(window.fecha_fin, fecha(2026, 8, 28));
        assert!(window.contains(fecha(2026, 8, 22)));
        assert!(window.contains(fecha(2026, 8, 28)));
        assert!(!window.contains(fecha(2026, 8, 21)));
        assert!(!window.contains(fecha(2026, 8, 29)));
    }

    #[test]
    fn ventana_de_un_dia_es_solo_hoy() {
        let window = ReportWindow::resolve(Some(1), fecha(2026, 8, 28));
        assert_eq!(window.fecha_inicio, Some(fecha(2026, 8, 28)));
        assert_eq!(window.fecha_fin, fecha(2026, 8, 28));
    }

    #[test]
    fn ventana_sin_cant_dias_es_historica() {
        let window = ReportWindow::resolve(None, fecha(2026, 8, 28));
        assert!(window.fecha_inicio.is_none());
        assert!(window.contains(fecha(1990, 1, 1)));
        assert!(!window.contains(fecha(2026, 8, 29)));
        assert!(window.previous().is_none());
    }

    #[test]
    fn ventana_anterior_es_contigua_y_de_igual_longitud() {
        let window = ReportWindow::resolve(Some(7), fecha(2026, 8, 28));
        let previa = window.previous().expect("ventana acotada tiene anterior");
        assert_eq!(previa.fecha_fin, fecha(2026, 8, 21));
        assert_eq!(previa.fecha_inicio, Some(fecha(2026, 8, 15)));
        // Las dos ventanas no se superponen
        assert!(!window.contains(previa.fecha_fin));
        assert!(!previa.contains(window.fecha_inicio.unwrap()));
    }

    #[test]
    fn parse_cant_dias_acepta_enteros_positivos() {
        assert_eq!(parse_cant_dias(Some("30")).unwrap(), Some(30));
        assert_eq!(parse_cant_dias(Some(" 7 ")).unwrap(), Some(7));
        assert_eq!(parse_cant_dias(None).unwrap(), None);
    }

    #[test]
    fn parse_cant_dias_rechaza_valores_invalidos() {
        assert!(parse_cant_dias(Some("abc")).is_err());
        assert!(parse_cant_dias(Some("7.5")).is_err());
        assert!(parse_cant_dias(Some("0")).is_err());
        assert!(parse_cant_dias(Some("-3")).is_err());
    }

    #[test]
    fn parse_cant_dias_rechaza_lookbacks_desmesurados() {
        assert!(parse_cant_dias(Some("1000000000")).is_err());

        let sobre_el_limite = (MAX_CANT_DIAS + 1).to_string();
        assert!(parse_cant_dias(Some(sobre_el_limite.as_str())).is_err());

        let en_el_limite = MAX_CANT_DIAS.to_string();
        assert_eq!(
            parse_cant_dias(Some(en_el_limite.as_str())).unwrap(),
            Some(MAX_CANT_DIAS)
        );
    }

    #[test]
    fn resolve_satura_en_vez_de_desbordar() {
        let window = ReportWindow::resolve(Some(1_000_000_000), fecha(2026, 8, 28));
        assert_eq!(window.fecha_inicio, Some(NaiveDate::MIN));
        assert_eq!(window.fecha_fin, fecha(2026, 8, 28));
        // la ventana anterior a la saturada tampoco entra en pánico
        let _ = window.previous();
    }
}
