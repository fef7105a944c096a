//! Modelos de dominio y DTOs de la API

pub mod dashboard;
pub mod empresa;
pub mod matricula;
pub mod user;
pub mod venta;
