use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::Supply;

pub async fn fetch_supply_by_name(name: &str, conn: &mut SqliteConnection) -> Result<Option<Supply>, sqlx::Error> {
    let row = sqlx::query_as("SELECT * FROM supplies WHERE name = $1").bind(name).fetch_optional(conn).await?;
    Ok(row)
}

/// Returns the supplier row for `name`, creating it if it does not exist yet. Same conflict-ignore
/// and re-select dance as [`super::products::fetch_or_create_product_price`].
pub async fn fetch_or_create_supply(name: &str, conn: &mut SqliteConnection) -> Result<Supply, sqlx::Error> {
    if let Some(existing) = fetch_supply_by_name(name, &mut *conn).await? {
        return Ok(existing);
    }
    let inserted: Option<Supply> =
        sqlx::query_as("INSERT INTO supplies (name) VALUES ($1) ON CONFLICT DO NOTHING RETURNING *")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    match inserted {
        Some(row) => {
            debug!("🗃️ Created supplier row #{} for {name}", row.id);
            Ok(row)
        },
        None => {
            let row = fetch_supply_by_name(name, conn).await?;
            row.ok_or(sqlx::Error::RowNotFound)
        },
    }
}
