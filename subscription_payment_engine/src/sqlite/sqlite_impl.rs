//! `SqliteDatabase` is the concrete SQLite backend for the subscription payment engine.
//!
//! It owns the connection pool and implements [`SubscriptionDatabase`] by delegating to the
//! low-level functions in [`super::db`], wrapping multi-statement units in short-lived
//! transactions.
use std::fmt::Debug;

use chrono::NaiveDate;
use log::debug;
use sps_common::Vnd;
use sqlx::SqlitePool;

use super::db::{ledger, new_pool, orders, products, receipts, supplies, supply_prices};
use crate::{
    db_types::{
        LedgerAccrual,
        NewPaymentReceipt,
        Order,
        PaymentReceipt,
        ProductPrice,
        ReconciledSupply,
        RenewalUpdate,
        Supply,
        SupplyPrice,
    },
    traits::{DatabaseError, SubscriptionDatabase},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl SubscriptionDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_receipt(&self, receipt: NewPaymentReceipt) -> Result<PaymentReceipt, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        receipts::insert_receipt(receipt, &mut conn).await
    }

    async fn fetch_receipts_for_code(&self, code: &str) -> Result<Vec<PaymentReceipt>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let rows = receipts::fetch_receipts_for_code(code, &mut conn).await?;
        Ok(rows)
    }

    async fn fetch_order_by_code(&self, code: &str) -> Result<Option<Order>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_code(code, &mut conn).await?;
        Ok(order)
    }

    /// Within one transaction: read the order, ensure the product and supplier master rows exist,
    /// and resolve the supplier's unit cost (seeding it from the order when absent). Rolls back
    /// atomically on any error.
    async fn reconcile_supply(&self, code: &str) -> Result<Option<ReconciledSupply>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let order = match orders::fetch_order_by_code(code, &mut tx).await? {
            Some(order) => order,
            None => {
                debug!("🗃️ No order matches code [{code}]. Nothing to reconcile.");
                return Ok(None);
            },
        };
        let product = products::fetch_or_create_product_price(&order.product, &mut tx).await?;
        let supplier_name = order.supplier.as_deref().unwrap_or_default();
        if supplier_name.is_empty() {
            debug!("🗃️ Order [{code}] names no supplier. Nothing to reconcile.");
            tx.commit().await?;
            return Ok(None);
        }
        let supply = supplies::fetch_or_create_supply(supplier_name, &mut tx).await?;
        let price = match supply_prices::fetch_current_price(product.id, supply.id, &mut tx).await? {
            Some(sp) => sp.price,
            None => {
                supply_prices::seed_price_if_absent(product.id, supply.id, order.cost, &mut tx).await?;
                order.cost
            },
        };
        tx.commit().await?;
        debug!("🗃️ Order [{code}] reconciled: product #{}, supplier #{}, unit cost {price}", product.id, supply.id);
        Ok(Some(ReconciledSupply { product_id: product.id, supply_id: supply.id, price }))
    }

    async fn accrue_payable(
        &self,
        supply_id: i64,
        price: Vnd,
        note_date: NaiveDate,
    ) -> Result<LedgerAccrual, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let accrual = ledger::accrue(supply_id, price, note_date, &mut tx).await?;
        tx.commit().await?;
        Ok(accrual)
    }

    async fn set_check_flag(&self, code: &str, flag: bool) -> Result<(), DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_check_flag(code, flag, &mut conn).await
    }

    async fn fetch_product_price_by_name(&self, name: &str) -> Result<Option<ProductPrice>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let row = products::fetch_product_price_by_name(name, &mut conn).await?;
        Ok(row)
    }

    async fn fetch_supply_by_name(&self, name: &str) -> Result<Option<Supply>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let row = supplies::fetch_supply_by_name(name, &mut conn).await?;
        Ok(row)
    }

    async fn fetch_current_supply_price(
        &self,
        product_id: i64,
        supply_id: i64,
    ) -> Result<Option<SupplyPrice>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let row = supply_prices::fetch_current_price(product_id, supply_id, &mut conn).await?;
        Ok(row)
    }

    async fn apply_renewal(&self, code: &str, update: RenewalUpdate) -> Result<Order, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        orders::apply_renewal(code, update, &mut conn).await
    }
}
