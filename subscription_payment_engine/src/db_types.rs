use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sps_common::Vnd;
use sqlx::{FromRow, Type};
use thiserror::Error;

use crate::helpers::strip_diacritics;

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct ConversionError(String);

//--------------------------------------   OrderStatus   --------------------------------------------------------------
/// The lifecycle states of a subscription order.
///
/// Legacy rows written by the admin UI carry free-text Vietnamese status values with inconsistent
/// casing and diacritics. [`OrderStatus::from_str`] normalises those once at the storage boundary;
/// everything inside the engine works with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The current billing cycle has not been paid for.
    Unpaid,
    /// Payment received, fulfilment in progress.
    Processing,
    /// The current billing cycle is fully paid.
    Paid,
    /// The order is approaching expiry and should be renewed.
    NeedsRenewal,
    /// The billing cycle lapsed without payment.
    Expired,
    /// Cancelled or awaiting a refund. The renewal engine never touches these.
    PendingRefund,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Unpaid => write!(f, "Unpaid"),
            OrderStatus::Processing => write!(f, "Processing"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::NeedsRenewal => write!(f, "NeedsRenewal"),
            OrderStatus::Expired => write!(f, "Expired"),
            OrderStatus::PendingRefund => write!(f, "PendingRefund"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strip_diacritics(s.trim().to_lowercase().as_str()).as_str() {
            "unpaid" | "chua thanh toan" => Ok(Self::Unpaid),
            "processing" | "dang xu ly" => Ok(Self::Processing),
            "paid" | "da thanh toan" => Ok(Self::Paid),
            "needsrenewal" | "needs_renewal" | "needs renewal" | "can gia han" => Ok(Self::NeedsRenewal),
            "expired" | "het han" => Ok(Self::Expired),
            "pendingrefund" | "pending_refund" | "cho hoan tien" | "canceled" | "cancelled" | "da huy" => {
                Ok(Self::PendingRefund)
            },
            other => Err(ConversionError(format!("Invalid order status: {other}"))),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Unrecognised order status in storage: {value}. Defaulting to Unpaid");
            OrderStatus::Unpaid
        })
    }
}

//--------------------------------------   LedgerStatus   -------------------------------------------------------------
/// Settlement state of a supply-ledger entry. An `Open` entry is the accumulation target for new
/// payables; entries are marked `Settled` by the back-office outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerStatus {
    Open,
    Settled,
}

impl Display for LedgerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Stored with the storefront's historical wording.
        match self {
            LedgerStatus::Open => write!(f, "Unpaid"),
            LedgerStatus::Settled => write!(f, "Paid"),
        }
    }
}

impl FromStr for LedgerStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match strip_diacritics(s.trim().to_lowercase().as_str()).as_str() {
            "unpaid" | "open" | "chua thanh toan" => Ok(Self::Open),
            "paid" | "settled" | "da thanh toan" => Ok(Self::Settled),
            other => Err(ConversionError(format!("Invalid ledger status: {other}"))),
        }
    }
}

impl From<String> for LedgerStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Unrecognised ledger status in storage: {value}. Treating entry as settled");
            LedgerStatus::Settled
        })
    }
}

//--------------------------------------    OrderCode     -------------------------------------------------------------
/// The human-assigned order identifier. Lookups are case-insensitive; codes carry a channel prefix
/// (see [`crate::helpers::channel_for_code`]).
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderCode(pub String);

impl FromStr for OrderCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      Order       -------------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub code: OrderCode,
    /// Product name plus an embedded duration descriptor, e.g. `NETFLIX-3THANG`.
    pub product: String,
    pub supplier: Option<String>,
    /// What the storefront pays the supplier for one cycle.
    pub cost: Vnd,
    /// What the customer pays for one cycle.
    pub price: Vnd,
    pub cycle_days: i64,
    /// Loosely formatted; parse with [`crate::helpers::parse_date_flexible`].
    pub start_date: Option<String>,
    pub expiry_date: Option<String>,
    pub info: Option<String>,
    pub slot: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    /// Tri-state renewal idempotency marker. `None` means the engine has not looked at the current
    /// cycle yet; `Some(false)` means acknowledged; `Some(true)` arms a forced renewal once the
    /// order is paid ahead.
    pub check_flag: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   ProductPrice   -------------------------------------------------------------
/// Per-product pricing multipliers. `pct_ctv` prices the cooperator channel; `pct_khach` stacks on
/// top of it for retail customers. Rows are created on demand with only the name populated.
#[derive(Debug, Clone, FromRow)]
pub struct ProductPrice {
    pub id: i64,
    pub name: String,
    pub pct_ctv: Option<f64>,
    pub pct_khach: Option<f64>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Supply      -------------------------------------------------------------
/// An upstream supplier of subscription slots.
#[derive(Debug, Clone, FromRow)]
pub struct Supply {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    SupplyPrice   -------------------------------------------------------------
/// The unit cost a supplier charges for a product. The latest row for a (product, supply) pair is
/// the current price.
#[derive(Debug, Clone, FromRow)]
pub struct SupplyPrice {
    pub id: i64,
    pub product_id: i64,
    pub supply_id: i64,
    pub price: Vnd,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------  PaymentReceipt  -------------------------------------------------------------
/// One accepted webhook notification. Append-only; there is deliberately no dedup key, so a
/// provider redelivery creates a second row and the back office resolves duplicates by hand.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentReceipt {
    pub id: i64,
    pub order_code: String,
    pub paid_date: String,
    pub amount: Vnd,
    pub sender: Option<String>,
    pub raw_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentReceipt {
    pub order_code: String,
    pub paid_date: NaiveDate,
    pub amount: Vnd,
    pub sender: Option<String>,
    pub raw_note: Option<String>,
}

//--------------------------------------    LedgerEntry   -------------------------------------------------------------
/// A rolling per-supplier payable. Exactly one open entry per supplier accumulates new import
/// value; once the back office settles it, the next accrual opens a fresh entry.
#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub supply_id: i64,
    pub import_value: Vnd,
    /// Opaque label for the settlement round, a `DD/MM/YYYY` date.
    pub round: String,
    #[sqlx(try_from = "String")]
    pub status: LedgerStatus,
    pub paid: Option<Vnd>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn is_open(&self) -> bool {
        self.status == LedgerStatus::Open && self.paid.is_none()
    }
}

/// How an accrual landed in the ledger.
#[derive(Debug, Clone)]
pub enum LedgerAccrual {
    /// The price was added to the existing open entry.
    Accumulated(LedgerEntry),
    /// A new open entry was created for this round.
    Opened(LedgerEntry),
}

impl LedgerAccrual {
    pub fn entry(&self) -> &LedgerEntry {
        match self {
            LedgerAccrual::Accumulated(e) | LedgerAccrual::Opened(e) => e,
        }
    }
}

//-------------------------------------- ReconciledSupply -------------------------------------------------------------
/// The outcome of supply-ledger reconciliation for one order: the master rows that now exist and
/// the unit cost to charge against the supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciledSupply {
    pub product_id: i64,
    pub supply_id: i64,
    pub price: Vnd,
}

//--------------------------------------   RenewalUpdate  -------------------------------------------------------------
/// The fields persisted when an order rolls into its next billing cycle.
#[derive(Debug, Clone, Copy)]
pub struct RenewalUpdate {
    pub start_date: NaiveDate,
    pub cycle_days: i64,
    pub expiry_date: NaiveDate,
    pub cost: Vnd,
    pub price: Vnd,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_status_normalisation() {
        assert_eq!("Chưa Thanh Toán".parse::<OrderStatus>().unwrap(), OrderStatus::Unpaid);
        assert_eq!(" đã thanh toán ".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert_eq!("CẦN GIA HẠN".parse::<OrderStatus>().unwrap(), OrderStatus::NeedsRenewal);
        assert_eq!("hết hạn".parse::<OrderStatus>().unwrap(), OrderStatus::Expired);
        assert_eq!("Expired".parse::<OrderStatus>().unwrap(), OrderStatus::Expired);
        assert!("gibberish".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn ledger_status_normalisation() {
        assert_eq!("chưa thanh toán".parse::<LedgerStatus>().unwrap(), LedgerStatus::Open);
        assert_eq!("Unpaid".parse::<LedgerStatus>().unwrap(), LedgerStatus::Open);
        assert_eq!("Đã Thanh Toán".parse::<LedgerStatus>().unwrap(), LedgerStatus::Settled);
    }
}
