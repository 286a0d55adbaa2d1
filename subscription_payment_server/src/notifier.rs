//! Best-effort delivery of renewal summaries to a Telegram chat.
//!
//! Notifications are a pure side effect: nothing downstream consumes the result, and a delivery
//! failure is logged and forgotten so it can never affect the webhook response.
use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde_json::json;
use sps_common::Secret;
use subscription_payment_engine::RenewalOutcome;

use crate::config::TelegramConfig;

#[derive(Clone)]
pub struct TelegramNotifier {
    bot_token: Secret<String>,
    chat_id: String,
    thread_id: Option<i64>,
    client: Arc<Client>,
}

impl TelegramNotifier {
    /// `None` when no bot token is configured; the caller then skips notifications entirely.
    pub fn try_new(config: TelegramConfig) -> Option<Self> {
        let bot_token = config.bot_token?;
        Some(Self { bot_token, chat_id: config.chat_id, thread_id: config.thread_id, client: Arc::new(Client::new()) })
    }

    pub async fn notify_renewal(&self, outcome: &RenewalOutcome) {
        let text = format_outcome(outcome);
        let mut body = json!({ "chat_id": self.chat_id, "text": text });
        if let Some(thread_id) = self.thread_id {
            body["message_thread_id"] = json!(thread_id);
        }
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token.reveal());
        match self.client.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("📣️ Renewal notification delivered.");
            },
            Ok(response) => {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                warn!("📣️ Telegram rejected the renewal notification. {status} {detail}");
            },
            Err(e) => warn!("📣️ Could not deliver renewal notification. {e}"),
        }
    }
}

fn format_outcome(outcome: &RenewalOutcome) -> String {
    match outcome {
        RenewalOutcome::Renewed(s) => {
            let mut lines = vec![
                format!("✅ Đã gia hạn {}", s.code),
                format!("Sản phẩm: {}", s.product),
            ];
            if let Some(info) = s.info.as_deref().filter(|i| !i.is_empty()) {
                lines.push(format!("Thông tin: {info}"));
            }
            if let Some(slot) = s.slot.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("Slot: {slot}"));
            }
            lines.push(format!("Chu kỳ: {} → {}", s.start_date, s.expiry_date));
            if let Some(supplier) = s.supplier.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("Nguồn: {supplier}"));
            }
            lines.push(format!("Giá nhập: {} | Giá bán: {}", s.cost, s.price));
            lines.join("\n")
        },
        RenewalOutcome::Skipped { code, days_left } => {
            format!("⏭ Bỏ qua {code}: còn {days_left} ngày mới hết hạn")
        },
        RenewalOutcome::Failed { code, reason } => format!("⚠️ Gia hạn {code} thất bại: {reason}"),
    }
}

#[cfg(test)]
mod test {
    use sps_common::Vnd;
    use subscription_payment_engine::{db_types::OrderStatus, RenewalSummary};

    use super::*;

    #[test]
    fn renewed_message_contains_the_cycle_and_prices() {
        let summary = RenewalSummary {
            code: "CTV1234".into(),
            product: "NETFLIX-3THANG".into(),
            info: Some("tk: someone@example.com".into()),
            slot: None,
            start_date: "15/03/2026".into(),
            expiry_date: "13/06/2026".into(),
            supplier: Some("Acme".into()),
            cost: Vnd::from(120_000),
            price: Vnd::from(96_000),
            status: OrderStatus::Unpaid,
        };
        let text = format_outcome(&RenewalOutcome::Renewed(summary));
        assert!(text.contains("CTV1234"));
        assert!(text.contains("15/03/2026 → 13/06/2026"));
        assert!(text.contains("96.000 ₫"));
        assert!(!text.contains("Slot:"));
    }

    #[test]
    fn skip_and_failure_messages_name_the_order() {
        let text = format_outcome(&RenewalOutcome::Skipped { code: "KH1".into(), days_left: 10 });
        assert!(text.contains("KH1") && text.contains("10"));
        let text = format_outcome(&RenewalOutcome::Failed { code: "KH1".into(), reason: "boom".into() });
        assert!(text.contains("boom"));
    }
}
