use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::ProductPrice;

pub async fn fetch_product_price_by_name(
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<ProductPrice>, sqlx::Error> {
    let row = sqlx::query_as("SELECT * FROM product_prices WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(row)
}

/// Returns the product-price row for `name`, creating a bare row (name only, no multipliers) if
/// none exists. The insert ignores a uniqueness conflict, so a concurrent creator simply loses
/// the race and the re-select picks up whichever row won.
pub async fn fetch_or_create_product_price(
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<ProductPrice, sqlx::Error> {
    if let Some(existing) = fetch_product_price_by_name(name, &mut *conn).await? {
        return Ok(existing);
    }
    let inserted: Option<ProductPrice> =
        sqlx::query_as("INSERT INTO product_prices (name) VALUES ($1) ON CONFLICT DO NOTHING RETURNING *")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    match inserted {
        Some(row) => {
            debug!("🗃️ Created product price row #{} for {name}", row.id);
            Ok(row)
        },
        None => {
            let row = fetch_product_price_by_name(name, conn).await?;
            row.ok_or(sqlx::Error::RowNotFound)
        },
    }
}
