use regex::Regex;

use crate::{db_types::OrderCode, helpers::ORDER_PREFIXES};

fn order_code_regex() -> Regex {
    let prefixes = ORDER_PREFIXES.iter().map(|(p, _)| *p).collect::<Vec<_>>().join("|");
    // A channel prefix followed by at least three alphanumeric characters.
    Regex::new(&format!(r"(?i)\b(?:{prefixes})[A-Za-z0-9]{{3,}}\b")).expect("order code pattern is valid")
}

/// Scans the content, note and description of a bank transfer for order codes.
///
/// Matches are uppercased and deduplicated, preserving discovery order. When no field contains a
/// pattern match, the last whitespace-separated token of the content is used as a fallback. The
/// result is a best-effort guess: callers must tolerate codes that match no stored order.
pub fn extract_order_codes(content: &str, note: Option<&str>, description: Option<&str>) -> Vec<OrderCode> {
    let re = order_code_regex();
    let mut codes: Vec<OrderCode> = Vec::new();
    for field in [Some(content), note, description].into_iter().flatten() {
        for m in re.find_iter(field) {
            let code = m.as_str().to_uppercase();
            if !codes.iter().any(|c| c.as_str() == code) {
                codes.push(OrderCode(code));
            }
        }
    }
    if codes.is_empty() {
        if let Some(last) = content.split_whitespace().last() {
            codes.push(OrderCode(last.to_uppercase()));
        }
    }
    codes
}

/// Splits transfer content into (order code, sender label).
///
/// With a single token, that token serves as both. With several, the last token is the code and
/// the first is the sender. Empty content yields empty strings.
pub fn split_code_and_sender(content: &str) -> (String, String) {
    let tokens = content.split_whitespace().collect::<Vec<_>>();
    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => ((*only).to_string(), (*only).to_string()),
        [first, .., last] => ((*last).to_string(), (*first).to_string()),
    }
}
