use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewPaymentReceipt, PaymentReceipt},
    traits::{DatabaseError, SubscriptionDatabase},
};

/// `ReceiptsApi` records incoming bank transfers as payment receipts.
///
/// A receipt is an append-only record of money that arrived. It is written before any
/// reconciliation or renewal work happens, so that a failure further down the pipeline never
/// loses the fact that a payment was received.
pub struct ReceiptsApi<B> {
    db: B,
}

impl<B> Debug for ReceiptsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReceiptsApi")
    }
}

impl<B> ReceiptsApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReceiptsApi<B>
where B: SubscriptionDatabase
{
    /// Persist a new payment receipt and return the stored row.
    pub async fn record_receipt(&self, receipt: NewPaymentReceipt) -> Result<PaymentReceipt, DatabaseError> {
        let stored = self.db.insert_receipt(receipt).await?;
        debug!(
            "🔄️🧾️ Receipt #{} recorded. {} from [{}] on {}",
            stored.id,
            stored.amount,
            stored.sender.as_deref().unwrap_or("unknown sender"),
            stored.paid_date
        );
        Ok(stored)
    }

    /// The full receipt trail for an order code, oldest first. Provider redeliveries appear as
    /// duplicate rows, which the back office resolves by hand.
    pub async fn receipt_trail(&self, code: &str) -> Result<Vec<PaymentReceipt>, DatabaseError> {
        let receipts = self.db.fetch_receipts_for_code(code).await?;
        debug!("🔄️🧾️ {} receipt(s) on record for [{code}]", receipts.len());
        Ok(receipts)
    }
}
