//! Webhook authenticity checks.
//!
//! The payment provider signs each call either with an HMAC-SHA256 hex digest over the raw request
//! body, delivered in one of several signature headers (or a query parameter), or with a static
//! API key in the `Authorization` header. Either credential is sufficient; a request presenting
//! neither, or only invalid ones, is rejected before anything touches the database.
use actix_web::HttpRequest;
use hmac::{Hmac, Mac};
use log::*;
use sha2::Sha256;
use sps_common::Secret;

use crate::config::WebhookAuthConfig;

const SIGNATURE_HEADERS: [&str; 4] = ["X-SEPAY-SIGNATURE", "X-Signature", "Signature", "X-Webhook-Signature"];
const SIGNATURE_PARAMS: [&str; 2] = ["signature", "sign"];

#[derive(Clone)]
pub struct WebhookVerifier {
    hmac_secret: Option<Secret<String>>,
    api_key: Option<Secret<String>>,
}

impl WebhookVerifier {
    pub fn new(config: WebhookAuthConfig) -> Self {
        Self { hmac_secret: config.hmac_secret, api_key: config.api_key }
    }

    /// `true` iff the request carries a valid signature over `body`, or a valid API key.
    pub fn verify(&self, req: &HttpRequest, body: &[u8]) -> bool {
        if let Some(provided) = extract_signature(req) {
            match &self.hmac_secret {
                Some(secret) => {
                    if verify_hmac(secret.reveal(), body, &provided) {
                        trace!("🔐️ HMAC signature check ✅️");
                        return true;
                    }
                    warn!("🔐️ Webhook call presented an invalid HMAC signature.");
                },
                None => warn!("🔐️ Webhook call presented a signature, but no HMAC secret is configured."),
            }
        }
        if let Some(provided) = extract_api_key(req) {
            match &self.api_key {
                Some(key) => {
                    if constant_time_eq(key.reveal().as_bytes(), provided.as_bytes()) {
                        trace!("🔐️ API key check ✅️");
                        return true;
                    }
                    warn!("🔐️ Webhook call presented an invalid API key.");
                },
                None => warn!("🔐️ Webhook call presented an API key, but none is configured."),
            }
        }
        false
    }
}

fn extract_signature(req: &HttpRequest) -> Option<String> {
    let from_headers = SIGNATURE_HEADERS
        .iter()
        .find_map(|name| req.headers().get(*name))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string());
    from_headers.or_else(|| {
        req.query_string().split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            SIGNATURE_PARAMS.contains(&k).then(|| v.trim().to_string())
        })
    })
}

fn extract_api_key(req: &HttpRequest) -> Option<String> {
    let auth = req.headers().get("Authorization").and_then(|v| v.to_str().ok()).and_then(|v| {
        let (scheme, key) = v.split_once(' ')?;
        scheme.eq_ignore_ascii_case("apikey").then(|| key.trim().to_string())
    });
    auth.or_else(|| req.headers().get("X-API-KEY").and_then(|v| v.to_str().ok()).map(|s| s.trim().to_string()))
}

fn verify_hmac(secret: &str, body: &[u8], provided: &str) -> bool {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());
    constant_time_eq(expected.as_bytes(), provided.trim().to_lowercase().as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn calculate_hmac(secret: &str, body: &[u8]) -> String {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
