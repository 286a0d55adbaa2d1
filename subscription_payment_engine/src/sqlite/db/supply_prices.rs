use sps_common::Vnd;
use sqlx::SqliteConnection;

use crate::db_types::SupplyPrice;

/// The current unit cost for a (product, supplier) pair. The latest row by insertion order wins.
pub async fn fetch_current_price(
    product_id: i64,
    supply_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<SupplyPrice>, sqlx::Error> {
    let row = sqlx::query_as(
        "SELECT * FROM supply_prices WHERE product_id = $1 AND supply_id = $2 ORDER BY id DESC LIMIT 1",
    )
    .bind(product_id)
    .bind(supply_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Seeds a supply price for the pair, ignoring the uniqueness conflict when a concurrent writer
/// inserted first. Callers use their own price value regardless of which writer won.
pub async fn seed_price_if_absent(
    product_id: i64,
    supply_id: i64,
    price: Vnd,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO supply_prices (product_id, supply_id, price) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
    )
    .bind(product_id)
    .bind(supply_id)
    .bind(price)
    .execute(conn)
    .await?;
    Ok(())
}
