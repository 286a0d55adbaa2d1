use std::fmt::Debug;

use chrono::{Days, Utc};
use log::*;
use sps_common::Vnd;
use thiserror::Error;

use crate::{
    db_types::{Order, OrderStatus, RenewalUpdate},
    helpers::{channel_for_code, days_from_months, months_from_string, parse_date_flexible, PriceChannel},
    spe_api::renewal_objects::{RenewalOutcome, RenewalSummary},
    traits::{DatabaseError, SubscriptionDatabase},
};

/// An order is renewed automatically only when its current cycle ends within this many days.
pub const RENEWAL_WINDOW_DAYS: i64 = 4;

#[derive(Debug, Error)]
pub enum RenewalError {
    #[error("Order [{0}] does not exist")]
    OrderNotFound(String),
    #[error("Order [{0}] has no parseable expiry date ({1})")]
    UnparseableExpiry(String, String),
    #[error("Product [{0}] carries no recognisable duration descriptor")]
    NoDuration(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// `RenewalApi` drives the order renewal state machine.
///
/// Each paid-up webhook triggers exactly one evaluation of the matched order. The check flag makes
/// the machine idempotent: once a cycle has been acknowledged or rolled over, redeliveries of the
/// same payment find the flag set and do nothing.
pub struct RenewalApi<B> {
    db: B,
}

impl<B> Debug for RenewalApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RenewalApi")
    }
}

impl<B> RenewalApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> RenewalApi<B>
where B: SubscriptionDatabase
{
    /// Run one step of the renewal state machine against the order's freshly read state.
    ///
    /// * `needs_renewal` / `expired` with an unset check flag renews the order (subject to the
    ///   renewal window).
    /// * `unpaid` with an unset check flag only acknowledges the payment by setting the flag to
    ///   `false`.
    /// * `paid` with the check flag armed (`true`) force-renews, rolling a pre-paid order straight
    ///   into its next cycle.
    /// * Every other combination is a no-op.
    pub async fn evaluate_after_payment(&self, order: &Order) -> Result<Option<RenewalOutcome>, DatabaseError> {
        use OrderStatus::*;
        let code = order.code.to_string();
        match (order.status, order.check_flag) {
            (NeedsRenewal | Expired, None) => Ok(Some(self.renew(&code, false).await)),
            (Unpaid, None) => {
                self.db.set_check_flag(&code, false).await?;
                debug!("🔄️⏳️ Order [{code}] is unpaid. Payment acknowledged, renewal deferred.");
                Ok(None)
            },
            (Paid, Some(true)) => Ok(Some(self.renew(&code, true).await)),
            _ => {
                trace!("🔄️⏳️ Order [{code}] ({}, flag {:?}) needs no renewal action", order.status, order.check_flag);
                Ok(None)
            },
        }
    }

    /// Renew the order's billing cycle. Errors are folded into a [`RenewalOutcome::Failed`] so
    /// callers can treat renewal as best-effort.
    pub async fn renew(&self, code: &str, forced: bool) -> RenewalOutcome {
        match self.renew_inner(code, forced).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("🔄️⏳️ Renewal of order [{code}] failed. {e}");
                RenewalOutcome::Failed { code: code.to_string(), reason: e.to_string() }
            },
        }
    }

    async fn renew_inner(&self, code: &str, forced: bool) -> Result<RenewalOutcome, RenewalError> {
        let order = self
            .db
            .fetch_order_by_code(code)
            .await?
            .ok_or_else(|| RenewalError::OrderNotFound(code.to_string()))?;
        let raw_expiry = order.expiry_date.clone().unwrap_or_default();
        let expiry = parse_date_flexible(&raw_expiry)
            .ok_or_else(|| RenewalError::UnparseableExpiry(code.to_string(), raw_expiry))?;
        let today = Utc::now().date_naive();
        let days_left = (expiry - today).num_days();
        if !forced && days_left > RENEWAL_WINDOW_DAYS {
            debug!("🔄️⏳️ Order [{code}] has {days_left} days left. Too early to renew.");
            return Ok(RenewalOutcome::Skipped { code: code.to_string(), days_left });
        }
        let months = months_from_string(&order.product).ok_or_else(|| RenewalError::NoDuration(order.product.clone()))?;
        let cycle_days = days_from_months(months);

        let product_price = self.db.fetch_product_price_by_name(&order.product).await?;
        let pct_ctv = product_price.as_ref().and_then(|p| p.pct_ctv).unwrap_or(1.0);
        let pct_khach = product_price.as_ref().and_then(|p| p.pct_khach).unwrap_or(1.0);

        let cost = self.resolve_cost(&order, product_price.as_ref().map(|p| p.id)).await?;
        let price = match channel_for_code(code) {
            PriceChannel::Cooperator => cost.scale(pct_ctv),
            PriceChannel::Retail => cost.scale(pct_ctv * pct_khach),
            PriceChannel::Standard => cost,
        };
        let cost = cost.round_to_thousand();
        let price = price.round_to_thousand();

        // The next cycle starts the day after the old one ends, whatever today's date is.
        let start_date = expiry + Days::new(1);
        let expiry_date = start_date + chrono::Duration::days(cycle_days);
        let update = RenewalUpdate { start_date, cycle_days, expiry_date, cost, price };
        let renewed = self.db.apply_renewal(code, update).await?;
        info!(
            "🔄️⏳️ Order [{code}] renewed{}: {} → {}, cost {cost}, price {price}",
            if forced { " (forced)" } else { "" },
            renewed.start_date.as_deref().unwrap_or_default(),
            renewed.expiry_date.as_deref().unwrap_or_default(),
        );
        Ok(RenewalOutcome::Renewed(RenewalSummary::from_order(&renewed)))
    }

    /// Prefer the supplier's current quoted unit cost; fall back to the cost already on the order
    /// when the supplier is unknown or has never quoted this product.
    async fn resolve_cost(&self, order: &Order, product_id: Option<i64>) -> Result<Vnd, DatabaseError> {
        let Some(product_id) = product_id else {
            return Ok(order.cost);
        };
        let Some(supplier_name) = order.supplier.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(order.cost);
        };
        let Some(supply) = self.db.fetch_supply_by_name(supplier_name).await? else {
            return Ok(order.cost);
        };
        let current = self.db.fetch_current_supply_price(product_id, supply.id).await?;
        Ok(current.map(|sp| sp.price).unwrap_or(order.cost))
    }
}
