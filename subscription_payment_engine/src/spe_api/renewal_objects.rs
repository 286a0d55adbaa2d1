use serde::Serialize;
use sps_common::Vnd;

use crate::db_types::{Order, OrderStatus};

/// The result of running the renewal evaluator against a paid-up order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenewalOutcome {
    /// The order was renewed and the new billing cycle has been written back.
    Renewed(RenewalSummary),
    /// The order's current cycle still has too long to run, so it was left alone.
    Skipped { code: String, days_left: i64 },
    /// Renewal was attempted but could not complete. Nothing was written.
    Failed { code: String, reason: String },
}

/// A flattened view of a freshly renewed order, suitable for notifications.
#[derive(Debug, Clone, Serialize)]
pub struct RenewalSummary {
    pub code: String,
    pub product: String,
    pub info: Option<String>,
    pub slot: Option<String>,
    pub start_date: String,
    pub expiry_date: String,
    pub supplier: Option<String>,
    pub cost: Vnd,
    pub price: Vnd,
    pub status: OrderStatus,
}

impl RenewalSummary {
    pub fn from_order(order: &Order) -> Self {
        Self {
            code: order.code.to_string(),
            product: order.product.clone(),
            info: order.info.clone(),
            slot: order.slot.clone(),
            start_date: order.start_date.clone().unwrap_or_default(),
            expiry_date: order.expiry_date.clone().unwrap_or_default(),
            supplier: order.supplier.clone(),
            cost: order.cost,
            price: order.price,
            status: order.status,
        }
    }
}
