use std::env;

use log::*;
use sps_common::{parse_boolean_flag, Secret};

const DEFAULT_SPS_HOST: &str = "127.0.0.1";
const DEFAULT_SPS_PORT: u16 = 8480;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub webhook: WebhookAuthConfig,
    pub telegram: TelegramConfig,
}

/// The credentials a payment provider may present on a webhook call. At least one of the two must
/// be configured, or every webhook call is rejected.
#[derive(Clone, Debug, Default)]
pub struct WebhookAuthConfig {
    /// Key for the HMAC-SHA256 signature over the raw request body.
    pub hmac_secret: Option<Secret<String>>,
    /// Static API key accepted via `Authorization: Apikey <key>` or `X-API-KEY`.
    pub api_key: Option<Secret<String>>,
}

/// Where renewal summaries are sent. Notifications are disabled when no bot token is configured.
#[derive(Clone, Debug, Default)]
pub struct TelegramConfig {
    pub bot_token: Option<Secret<String>>,
    pub chat_id: String,
    /// Optional forum topic to post into.
    pub thread_id: Option<i64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SPS_HOST.to_string(),
            port: DEFAULT_SPS_PORT,
            database_url: String::default(),
            webhook: WebhookAuthConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SPS_HOST").ok().unwrap_or_else(|| DEFAULT_SPS_HOST.into());
        let port = env::var("SPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SPS_PORT. {e} Using the default, {DEFAULT_SPS_PORT}, instead."
                    );
                    DEFAULT_SPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SPS_PORT);
        let database_url = env::var("SPS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SPS_DATABASE_URL is not set. Please set it to the URL for the storefront database.");
            String::default()
        });
        let webhook = WebhookAuthConfig::from_env_or_default();
        let telegram = TelegramConfig::from_env_or_default();
        Self { host, port, database_url, webhook, telegram }
    }
}

impl WebhookAuthConfig {
    pub fn from_env_or_default() -> Self {
        let hmac_secret = env::var("SPS_WEBHOOK_HMAC_SECRET").ok().filter(|s| !s.is_empty()).map(Secret::new);
        let api_key = env::var("SPS_WEBHOOK_API_KEY").ok().filter(|s| !s.is_empty()).map(Secret::new);
        if hmac_secret.is_none() && api_key.is_none() {
            error!(
                "🪛️ Neither SPS_WEBHOOK_HMAC_SECRET nor SPS_WEBHOOK_API_KEY is set. All webhook calls will be \
                 rejected until one of them is configured."
            );
        }
        Self { hmac_secret, api_key }
    }
}

impl TelegramConfig {
    pub fn from_env_or_default() -> Self {
        let enabled = parse_boolean_flag(env::var("SPS_TELEGRAM_NOTIFICATIONS").ok(), true);
        if !enabled {
            info!("🪛️ Renewal notifications are switched off by SPS_TELEGRAM_NOTIFICATIONS.");
            return Self::default();
        }
        let bot_token = env::var("SPS_TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.is_empty()).map(Secret::new);
        if bot_token.is_none() {
            info!("🪛️ SPS_TELEGRAM_BOT_TOKEN is not set. Renewal notifications are disabled.");
        }
        let chat_id = env::var("SPS_TELEGRAM_CHAT_ID").ok().unwrap_or_else(|| {
            if bot_token.is_some() {
                warn!("🪛️ SPS_TELEGRAM_CHAT_ID is not set. Renewal notifications will fail to deliver.");
            }
            String::default()
        });
        let thread_id = env::var("SPS_TELEGRAM_THREAD_ID").ok().and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| {
                    warn!("🪛️ {s} is not a valid topic id for SPS_TELEGRAM_THREAD_ID. {e} Ignoring it.");
                })
                .ok()
        });
        Self { bot_token, chat_id, thread_id }
    }
}
