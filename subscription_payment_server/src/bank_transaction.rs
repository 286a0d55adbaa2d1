//! Normalization of incoming webhook payloads.
//!
//! Providers are inconsistent about payload shape: some wrap the transfer in a `transaction`
//! object, some send the fields flat, and field names vary between camelCase and snake_case
//! variants. Everything funnels into [`BankTransaction`], which lives only for the duration of
//! one request.
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use sps_common::Vnd;
use subscription_payment_engine::{
    db_types::{NewPaymentReceipt, OrderCode},
    helpers::{clean_amount, extract_order_codes, parse_date_flexible, split_code_and_sender},
};

#[derive(Debug, Clone, Default)]
pub struct BankTransaction {
    pub content: Option<String>,
    pub transaction_date: Option<String>,
    pub transfer_amount: Option<Value>,
    pub description: Option<String>,
    pub note: Option<String>,
}

const CONTENT_ALIASES: [&str; 3] = ["content", "Content", "transaction_content"];
const DATE_ALIASES: [&str; 4] = ["transactionDate", "transaction_date", "transferTime", "time"];
const AMOUNT_ALIASES: [&str; 5] = ["amount_in", "transferAmount", "amountIn", "amount", "transfer_amount"];

/// The first alias carrying a non-null value. A payload listing the same logical field under
/// several names is sloppy but not a reason to reject it.
fn first_present<'a>(obj: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().filter_map(|key| obj.get(*key)).find(|v| !v.is_null())
}

fn first_string(obj: &Value, aliases: &[&str]) -> Option<String> {
    first_present(obj, aliases).and_then(|v| v.as_str()).map(str::to_string)
}

/// Pulls a usable transaction out of the raw webhook body. Returns `None` when the payload holds
/// no transfer content, no date and no amount.
pub fn normalize_transaction(body: &Value) -> Option<BankTransaction> {
    let obj = match body.get("transaction") {
        Some(tx) if tx.is_object() => tx,
        _ => body,
    };
    if !obj.is_object() {
        return None;
    }
    let tx = BankTransaction {
        content: first_string(obj, &CONTENT_ALIASES),
        transaction_date: first_string(obj, &DATE_ALIASES),
        transfer_amount: first_present(obj, &AMOUNT_ALIASES).cloned(),
        description: first_string(obj, &["description"]),
        note: first_string(obj, &["note"]),
    };
    let usable =
        !tx.content_text().is_empty() || tx.transaction_date.is_some() || tx.transfer_amount.is_some();
    usable.then_some(tx)
}

impl BankTransaction {
    /// The transfer's free text: `content`, falling back to `description` and then `note`.
    fn content_text(&self) -> &str {
        [self.content.as_deref(), self.description.as_deref(), self.note.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or_default()
    }

    pub fn amount(&self) -> Vnd {
        let raw = match &self.transfer_amount {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Vnd::from(clean_amount(&raw).unwrap_or(0))
    }

    /// The transfer date, or today when the provider sent nothing parseable.
    pub fn paid_date(&self) -> NaiveDate {
        self.transaction_date
            .as_deref()
            .and_then(parse_date_flexible)
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Every order code found in the transfer's free-text fields, best match first.
    pub fn order_codes(&self) -> Vec<OrderCode> {
        extract_order_codes(
            self.content.as_deref().unwrap_or_default(),
            self.note.as_deref(),
            self.description.as_deref(),
        )
    }

    /// The receipt row this transfer should land as. The recorded code is always the last
    /// whitespace token of the free text, even when a pattern-matched order code sits elsewhere
    /// in it; code matches found by [`Self::order_codes`] drive the bookkeeping, not the receipt.
    pub fn to_receipt(&self) -> NewPaymentReceipt {
        let (code, sender) = split_code_and_sender(self.content_text());
        NewPaymentReceipt {
            order_code: code.to_uppercase(),
            paid_date: self.paid_date(),
            amount: self.amount(),
            sender: (!sender.is_empty()).then_some(sender),
            raw_note: self.note.clone().or_else(|| self.description.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn wrapped_and_flat_payloads_normalize_identically() {
        let flat = json!({"content": "NGUYEN VAN A CTV1234", "transferAmount": "150000.00"});
        let wrapped = json!({"transaction": {"content": "NGUYEN VAN A CTV1234", "amount_in": "150000.00"}});
        let a = normalize_transaction(&flat).unwrap();
        let b = normalize_transaction(&wrapped).unwrap();
        assert_eq!(a.content, b.content);
        assert_eq!(a.amount().value(), 150_000);
        assert_eq!(b.amount().value(), 150_000);
    }

    #[test]
    fn numeric_amounts_are_accepted() {
        let tx = normalize_transaction(&json!({"content": "KH77AB", "transferAmount": 99000})).unwrap();
        assert_eq!(tx.amount().value(), 99_000);
    }

    #[test]
    fn garbage_amounts_keep_leading_digits() {
        let tx = normalize_transaction(&json!({"content": "x", "amount": "1,234abc"})).unwrap();
        assert_eq!(tx.amount().value(), 1_234);
    }

    #[test]
    fn competing_amount_aliases_pick_the_first_and_never_reject() {
        let tx = normalize_transaction(&json!({
            "content": "KH77AB",
            "amount_in": "120000",
            "transferAmount": "99000",
            "amount": 50000
        }))
        .expect("payload with several amount aliases must still normalize");
        assert_eq!(tx.amount().value(), 120_000);
    }

    #[test]
    fn empty_payloads_are_rejected() {
        assert!(normalize_transaction(&json!({})).is_none());
        assert!(normalize_transaction(&json!({"content": "   "})).is_none());
        assert!(normalize_transaction(&json!({"transaction": {}})).is_none());
    }

    #[test]
    fn description_stands_in_for_missing_content() {
        let tx =
            normalize_transaction(&json!({"description": "TRAN THI B DH5678", "time": "14/03/2026"}))
                .unwrap();
        let receipt = tx.to_receipt();
        assert_eq!(receipt.order_code, "DH5678");
        assert_eq!(receipt.sender.as_deref(), Some("TRAN"));
        assert_eq!(receipt.paid_date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn receipt_takes_last_token_code_and_first_token_sender() {
        let tx = normalize_transaction(&json!({
            "content": "NGUYEN VAN A thanh toan CTV1234",
            "transferAmount": "120000",
            "transactionDate": "2026-03-14 10:22:01"
        }))
        .unwrap();
        let receipt = tx.to_receipt();
        assert_eq!(receipt.order_code, "CTV1234");
        assert_eq!(receipt.sender.as_deref(), Some("NGUYEN"));
        assert_eq!(receipt.paid_date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(receipt.amount.value(), 120_000);
    }

    #[test]
    fn receipt_code_stays_the_last_token_when_a_code_appears_mid_text() {
        let tx = normalize_transaction(&json!({
            "content": "CTV1234 chuyen tien cho ban",
            "transferAmount": "80000"
        }))
        .unwrap();
        let receipt = tx.to_receipt();
        assert_eq!(receipt.order_code, "BAN");
        assert_eq!(receipt.sender.as_deref(), Some("CTV1234"));
        // The pattern match still wins for order lookup.
        assert_eq!(tx.order_codes().first().map(ToString::to_string).as_deref(), Some("CTV1234"));
    }
}
