use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Order, RenewalUpdate},
    helpers::format_dmy,
    traits::DatabaseError,
};

/// Returns the order with the given code, if any. The `code` column collates NOCASE, so the
/// lookup is case-insensitive.
pub async fn fetch_order_by_code(code: &str, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE code = $1").bind(code).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn set_check_flag(code: &str, flag: bool, conn: &mut SqliteConnection) -> Result<(), DatabaseError> {
    let result =
        sqlx::query("UPDATE orders SET check_flag = $1, updated_at = CURRENT_TIMESTAMP WHERE code = $2")
            .bind(flag)
            .bind(code)
            .execute(conn)
            .await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::OrderNotFound(code.to_string()));
    }
    Ok(())
}

/// Rolls the order into its next billing cycle. Status returns to `Unpaid` and the check flag to
/// `false` in the same statement, so a renewal can never leave the order half-updated.
pub async fn apply_renewal(
    code: &str,
    update: RenewalUpdate,
    conn: &mut SqliteConnection,
) -> Result<Order, DatabaseError> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                start_date = $1,
                cycle_days = $2,
                expiry_date = $3,
                cost = $4,
                price = $5,
                status = 'Unpaid',
                check_flag = 0,
                updated_at = CURRENT_TIMESTAMP
            WHERE code = $6
            RETURNING *;
        "#,
    )
    .bind(format_dmy(update.start_date))
    .bind(update.cycle_days)
    .bind(format_dmy(update.expiry_date))
    .bind(update.cost)
    .bind(update.price)
    .bind(code)
    .fetch_optional(conn)
    .await?;
    let order = order.ok_or_else(|| DatabaseError::OrderNotFound(code.to_string()))?;
    debug!("🗃️ Order [{}] renewed. New cycle {} → {}", order.code, order.start_date.as_deref().unwrap_or("?"), order
        .expiry_date
        .as_deref()
        .unwrap_or("?"));
    Ok(order)
}
