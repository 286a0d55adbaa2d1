use chrono::NaiveDate;
use log::debug;
use sps_common::Vnd;
use sqlx::SqliteConnection;

use crate::{
    db_types::{LedgerAccrual, LedgerEntry},
    helpers::format_dmy,
    traits::DatabaseError,
};

/// The most recent ledger entry for a supplier, open or settled.
pub async fn fetch_latest_entry(
    supply_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<LedgerEntry>, sqlx::Error> {
    let row = sqlx::query_as("SELECT * FROM supply_ledger WHERE supply_id = $1 ORDER BY id DESC LIMIT 1")
        .bind(supply_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Adds `price` to the supplier's open entry, or opens a new entry for the round labelled with
/// `note_date`.
///
/// The schema enforces at most one open entry per supplier (partial unique index), so the insert
/// uses conflict-ignore semantics and falls back to accumulating into whichever entry a concurrent
/// caller opened first.
pub async fn accrue(
    supply_id: i64,
    price: Vnd,
    note_date: NaiveDate,
    conn: &mut SqliteConnection,
) -> Result<LedgerAccrual, DatabaseError> {
    if let Some(entry) = fetch_latest_entry(supply_id, &mut *conn).await? {
        if entry.is_open() {
            let updated = accumulate(entry.id, price, &mut *conn).await?;
            if let Some(updated) = updated {
                debug!("🗃️ Ledger entry #{} grew to {}", updated.id, updated.import_value);
                return Ok(LedgerAccrual::Accumulated(updated));
            }
            // The entry was settled between the read and the update; fall through and open a new
            // round.
        }
    }
    let opened: Option<LedgerEntry> = sqlx::query_as(
        r#"
            INSERT INTO supply_ledger (supply_id, import_value, round, status, paid)
            VALUES ($1, $2, $3, 'Unpaid', NULL)
            ON CONFLICT DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(supply_id)
    .bind(price)
    .bind(format_dmy(note_date))
    .fetch_optional(&mut *conn)
    .await?;
    match opened {
        Some(entry) => {
            debug!("🗃️ Opened ledger round {} for supplier #{supply_id} at {}", entry.round, entry.import_value);
            Ok(LedgerAccrual::Opened(entry))
        },
        None => {
            // A concurrent webhook opened the round first. Accumulate into it instead.
            let updated: LedgerEntry = sqlx::query_as(
                r#"
                    UPDATE supply_ledger
                    SET import_value = import_value + $1, updated_at = CURRENT_TIMESTAMP
                    WHERE supply_id = $2 AND status = 'Unpaid' AND paid IS NULL
                    RETURNING *;
                "#,
            )
            .bind(price)
            .bind(supply_id)
            .fetch_one(&mut *conn)
            .await?;
            debug!("🗃️ Lost the open-round race for supplier #{supply_id}; accumulated into entry #{}", updated.id);
            Ok(LedgerAccrual::Accumulated(updated))
        },
    }
}

async fn accumulate(
    entry_id: i64,
    price: Vnd,
    conn: &mut SqliteConnection,
) -> Result<Option<LedgerEntry>, sqlx::Error> {
    // Openness was already decided from the normalised status; the `paid IS NULL` guard only
    // protects against the entry being settled between the read and this update. Legacy rows may
    // carry diacritic status text, so the status column is not re-checked here.
    let row = sqlx::query_as(
        r#"
            UPDATE supply_ledger
            SET import_value = import_value + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND paid IS NULL
            RETURNING *;
        "#,
    )
    .bind(price)
    .bind(entry_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}
