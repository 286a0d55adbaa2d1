use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPaymentReceipt, PaymentReceipt},
    traits::DatabaseError,
};

/// Appends one payment receipt. There is no dedup key: every accepted webhook call lands a row,
/// including provider redeliveries.
pub async fn insert_receipt(
    receipt: NewPaymentReceipt,
    conn: &mut SqliteConnection,
) -> Result<PaymentReceipt, DatabaseError> {
    let row: PaymentReceipt = sqlx::query_as(
        r#"
            INSERT INTO payment_receipts (order_code, paid_date, amount, sender, raw_note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(receipt.order_code)
    .bind(receipt.paid_date.format("%Y-%m-%d").to_string())
    .bind(receipt.amount)
    .bind(receipt.sender)
    .bind(receipt.raw_note)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Receipt #{} recorded for [{}]: {}", row.id, row.order_code, row.amount);
    Ok(row)
}

/// All receipts recorded against an order code, oldest first.
pub async fn fetch_receipts_for_code(
    code: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentReceipt>, sqlx::Error> {
    let rows = sqlx::query_as("SELECT * FROM payment_receipts WHERE order_code = $1 ORDER BY id ASC")
        .bind(code)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
