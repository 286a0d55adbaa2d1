//! The storage behaviour required by the payment engine.
//!
//! Backends implement [`SubscriptionDatabase`]; the engine's public APIs are generic over it, so
//! the business rules never see a concrete database.

use chrono::NaiveDate;
use sps_common::Vnd;
use thiserror::Error;

use crate::db_types::{
    LedgerAccrual,
    NewPaymentReceipt,
    Order,
    PaymentReceipt,
    ProductPrice,
    ReconciledSupply,
    RenewalUpdate,
    Supply,
    SupplyPrice,
};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Order {0} does not exist")]
    OrderNotFound(String),
}

/// The contract a storage backend must fulfil to drive webhook reconciliation and renewals.
///
/// Multi-statement operations (`reconcile_supply`, `accrue_payable`) are atomic: implementations
/// wrap them in a single short-lived transaction and roll back on any error. Single-row reads and
/// writes acquire a pool connection for the duration of the call only.
#[allow(async_fn_in_trait)]
pub trait SubscriptionDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Appends one payment receipt. This is the authoritative record that money arrived and the
    /// only webhook write whose failure aborts the request.
    async fn insert_receipt(&self, receipt: NewPaymentReceipt) -> Result<PaymentReceipt, DatabaseError>;

    /// All receipts recorded against an order code, oldest first. Redeliveries show up as
    /// duplicate rows; there is no dedup key.
    async fn fetch_receipts_for_code(&self, code: &str) -> Result<Vec<PaymentReceipt>, DatabaseError>;

    /// Case-insensitive order lookup. A miss is not an error.
    async fn fetch_order_by_code(&self, code: &str) -> Result<Option<Order>, DatabaseError>;

    /// Ensures the product and supplier master rows referenced by the order exist and resolves the
    /// unit cost to charge against the supplier. Returns `None` when no order matches the code.
    ///
    /// When the (product, supplier) pair has no stored price yet, a row seeded with the order's
    /// own cost is inserted with conflict-ignore semantics, so concurrent webhooks cannot create
    /// duplicates; the order's cost is used either way.
    async fn reconcile_supply(&self, code: &str) -> Result<Option<ReconciledSupply>, DatabaseError>;

    /// Adds `price` to the supplier's open ledger entry, or opens a new entry labelled with
    /// `note_date` when no open entry exists. At most one open entry per supplier survives
    /// concurrent accruals.
    async fn accrue_payable(&self, supply_id: i64, price: Vnd, note_date: NaiveDate)
        -> Result<LedgerAccrual, DatabaseError>;

    /// Sets the renewal idempotency marker on an order.
    async fn set_check_flag(&self, code: &str, flag: bool) -> Result<(), DatabaseError>;

    async fn fetch_product_price_by_name(&self, name: &str) -> Result<Option<ProductPrice>, DatabaseError>;

    async fn fetch_supply_by_name(&self, name: &str) -> Result<Option<Supply>, DatabaseError>;

    /// The current unit cost for a (product, supplier) pair: the latest stored row wins.
    async fn fetch_current_supply_price(
        &self,
        product_id: i64,
        supply_id: i64,
    ) -> Result<Option<SupplyPrice>, DatabaseError>;

    /// Rolls an order into its next billing cycle: start, cycle length, expiry, cost and price are
    /// replaced, the status returns to `Unpaid` and the check flag to `false`, all in one update.
    async fn apply_renewal(&self, code: &str, update: RenewalUpdate) -> Result<Order, DatabaseError>;
}
