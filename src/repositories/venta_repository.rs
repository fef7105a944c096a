use sqlx::PgPool;

use crate::models::venta::{Venta, VentaLinea};
use crate::utils::errors::AppError;

pub struct VentaRepository {
    pool: PgPool,
}

impl VentaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar la venta y sus líneas en una sola transacción.
    /// Las líneas pertenecen exclusivamente a su venta (cascade al borrar).
    pub async fn create(&self, venta: &Venta, lineas: &[VentaLinea]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO ventas (
                id, empresa_id, matricula_id, tipo, identificador_tr, ticket,
                fecha, codigo_cliente, ruc_cliente, nombre_cliente,
                codigo_estacion, nombre_estacion, codigo_moneda, total,
                documento_chofer, nombre_chofer, matricula, kilometraje,
                tarjeta, created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            "#,
        )
        .bind(venta.id)
        .bind(venta.empresa_id)
        .bind(venta.matricula_id)
        .bind(&venta.tipo)
        .bind(&venta.identificador_tr)
        .bind(&venta.ticket)
        .bind(venta.fecha)
        .bind(&venta.codigo_cliente)
        .bind(&venta.ruc_cliente)
        .bind(&venta.nombre_cliente)
        .bind(&venta.codigo_estacion)
        .bind(&venta.nombre_estacion)
        .bind(&venta.codigo_moneda)
        .bind(venta.total)
        .bind(&venta.documento_chofer)
        .bind(&venta.nombre_chofer)
        .bind(&venta.matricula)
        .bind(venta.kilometraje)
        .bind(&venta.tarjeta)
        .bind(venta.created_at)
        .execute(&mut *tx)
        .await?;

        for linea in lineas {
            sqlx::query(
                r#"
                INSERT INTO venta_lineas (
                    id, venta_id, codigo_producto, nombre_producto,
                    precio_unitario, cantidad, subtotal
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(linea.id)
            .bind(linea.venta_id)
            .bind(&linea.codigo_producto)
            .bind(&linea.nombre_producto)
            .bind(linea.precio_unitario)
            .bind(linea.cantidad)
            .bind(linea.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
