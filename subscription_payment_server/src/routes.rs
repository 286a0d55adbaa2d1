//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::*;
use serde_json::{json, Value};
use subscription_payment_engine::{
    ReceiptsApi,
    ReconciliationApi,
    RenewalApi,
    RenewalOutcome,
    SqliteDatabase,
    SubscriptionDatabase,
};

use crate::{
    auth::WebhookVerifier,
    bank_transaction::{normalize_transaction, BankTransaction},
    errors::ServerError,
    notifier::TelegramNotifier,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Webhook  ---------------------------------------------------
#[get("/webhook/payment")]
pub async fn payment_webhook_info() -> impl Responder {
    HttpResponse::Ok().body("This endpoint accepts POSTed bank transfer notifications from the payment provider.\n")
}

/// The webhook entry point for bank transfer notifications.
///
/// The receipt insert is the only fatal write: once it succeeds, ledger reconciliation and renewal
/// each fail soft, so a bug in secondary bookkeeping can never make the provider retry-storm the
/// receipt trail.
#[post("/webhook/payment")]
pub async fn payment_webhook(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<WebhookVerifier>,
    receipts: web::Data<ReceiptsApi<SqliteDatabase>>,
    reconciliation: web::Data<ReconciliationApi<SqliteDatabase>>,
    renewals: web::Data<RenewalApi<SqliteDatabase>>,
    db: web::Data<SqliteDatabase>,
    notifier: web::Data<Option<TelegramNotifier>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💸️ Received webhook request: {}", req.uri());
    if !verifier.verify(&req, &body) {
        warn!("💸️ Rejected webhook call with invalid credentials.");
        return Err(ServerError::InvalidSignature);
    }
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("💸️ Webhook body is not valid JSON. {e}");
        ServerError::MissingTransaction
    })?;
    let tx = normalize_transaction(&payload).ok_or_else(|| {
        warn!("💸️ Webhook body holds no usable transaction.");
        ServerError::MissingTransaction
    })?;

    let receipt = tx.to_receipt();
    // The receipt keeps the raw last-token code; a pattern-matched code anywhere in the free
    // text takes precedence for order lookup.
    let code = tx
        .order_codes()
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| receipt.order_code.clone());
    let receipt = receipts.record_receipt(receipt).await.map_err(|e| {
        error!("💸️ Could not record payment receipt for [{code}]. {e}");
        ServerError::ReceiptWriteFailure(e.to_string())
    })?;
    info!("💸️ Receipt #{} recorded: {} against [{}]", receipt.id, receipt.amount, receipt.order_code);

    reconcile_books(&reconciliation, &code, &tx).await;
    let renewal = run_renewal(&renewals, db.get_ref(), &code).await;
    if let Some(notifier) = notifier.get_ref() {
        if let Some(outcome) = renewal.clone() {
            let notifier = notifier.clone();
            tokio::spawn(async move { notifier.notify_renewal(&outcome).await });
        }
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "OK", "renewal": renewal })))
}

/// Keep the supplier books in step with the payment. Failures are logged and swallowed.
async fn reconcile_books(api: &ReconciliationApi<SqliteDatabase>, code: &str, tx: &BankTransaction) {
    match api.reconcile_order_supply(code).await {
        Ok(Some(supply)) => {
            if let Err(e) = api.accrue_payable(supply.supply_id, supply.price, tx.paid_date()).await {
                warn!("💸️ Could not accrue payable for [{code}]. {e}");
            }
        },
        Ok(None) => debug!("💸️ No supplier bookkeeping needed for [{code}]."),
        Err(e) => warn!("💸️ Could not reconcile supplier books for [{code}]. {e}"),
    }
}

/// Run one step of the renewal state machine. Failures are logged and swallowed.
async fn run_renewal(api: &RenewalApi<SqliteDatabase>, db: &SqliteDatabase, code: &str) -> Option<RenewalOutcome> {
    let order = match db.fetch_order_by_code(code).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            debug!("💸️ No order matches [{code}]. Skipping renewal evaluation.");
            return None;
        },
        Err(e) => {
            warn!("💸️ Could not load order [{code}] for renewal evaluation. {e}");
            return None;
        },
    };
    match api.evaluate_after_payment(&order).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("💸️ Renewal evaluation for [{code}] failed. {e}");
            None
        },
    }
}
