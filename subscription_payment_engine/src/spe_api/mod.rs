//! The public APIs of the payment engine. Each API struct is generic over a
//! [`crate::traits::SubscriptionDatabase`] backend and owns one slice of the payment flow.
mod receipts_api;
mod reconciliation_api;
mod renewal_api;
mod renewal_objects;

pub use receipts_api::ReceiptsApi;
pub use reconciliation_api::ReconciliationApi;
pub use renewal_api::{RenewalApi, RenewalError, RENEWAL_WINDOW_DAYS};
pub use renewal_objects::{RenewalOutcome, RenewalSummary};
