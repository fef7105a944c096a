//! Repositorios de acceso a datos

pub mod dashboard_repository;
pub mod empresa_repository;
pub mod matricula_repository;
pub mod user_repository;
pub mod venta_repository;

pub use dashboard_repository::DashboardRepository;
pub use empresa_repository::EmpresaRepository;
pub use matricula_repository::MatriculaRepository;
pub use user_repository::UserRepository;
pub use venta_repository::VentaRepository;
