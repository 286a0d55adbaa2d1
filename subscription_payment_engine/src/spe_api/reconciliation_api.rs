use std::fmt::Debug;

use chrono::NaiveDate;
use log::*;

use crate::{
    db_types::{LedgerAccrual, ReconciledSupply},
    traits::{DatabaseError, SubscriptionDatabase},
};

/// `ReconciliationApi` keeps the supplier-side books in step with incoming payments.
///
/// When a payment lands against an order, the product and supplier master rows are created on
/// demand, the supplier's current unit cost is resolved (seeded from the order if the supplier
/// has never quoted the product before), and that cost is accrued into the supplier's open
/// payable ledger entry.
pub struct ReconciliationApi<B> {
    db: B,
}

impl<B> Debug for ReconciliationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B> ReconciliationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReconciliationApi<B>
where B: SubscriptionDatabase
{
    /// Ensure master data exists for the order's product and supplier and return the supplier's
    /// current unit cost. Returns `None` when the code matches no order, or the order names no
    /// supplier.
    pub async fn reconcile_order_supply(&self, code: &str) -> Result<Option<ReconciledSupply>, DatabaseError> {
        self.db.reconcile_supply(code).await
    }

    /// Add `price` to the supplier's open ledger entry, opening a new one if every previous entry
    /// has been settled. A non-positive price is a no-op, since a zero-cost order owes the
    /// supplier nothing.
    pub async fn accrue_payable(
        &self,
        supply_id: i64,
        price: sps_common::Vnd,
        note_date: NaiveDate,
    ) -> Result<Option<LedgerAccrual>, DatabaseError> {
        if !price.is_positive() {
            debug!("🔄️📒️ Unit cost {price} for supplier #{supply_id} is not positive. Skipping accrual.");
            return Ok(None);
        }
        let accrual = self.db.accrue_payable(supply_id, price, note_date).await?;
        match &accrual {
            LedgerAccrual::Accumulated(entry) => {
                debug!("🔄️📒️ Accrued {price} into open ledger entry #{} for supplier #{supply_id}", entry.id)
            },
            LedgerAccrual::Opened(entry) => {
                debug!("🔄️📒️ Opened ledger entry #{} for supplier #{supply_id} with {price}", entry.id)
            },
        }
        Ok(Some(accrual))
    }
}
