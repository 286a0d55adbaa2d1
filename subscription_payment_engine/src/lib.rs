//! Subscription Payment Engine
//!
//! The engine behind the storefront's bank-transfer payment flow. It records payment receipts,
//! keeps the per-supplier payable ledger in step with incoming money, and drives the renewal state
//! machine that rolls subscription orders into their next billing cycle.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the only supported backend. You
//!    should never need to access the database directly; use the public APIs instead. The
//!    exception is the data types used in the database, which are defined in [`mod@db_types`] and
//!    are public.
//! 2. The engine public API ([`ReceiptsApi`], [`ReconciliationApi`], [`RenewalApi`]). Each API is
//!    generic over the [`SubscriptionDatabase`] trait, which a backend implements to power the
//!    payment server.
pub mod db_types;
pub mod helpers;
mod spe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use spe_api::{
    ReceiptsApi,
    ReconciliationApi,
    RenewalApi,
    RenewalError,
    RenewalOutcome,
    RenewalSummary,
    RENEWAL_WINDOW_DAYS,
};
pub use traits::{DatabaseError, SubscriptionDatabase};
