use regex::Regex;

/// Replaces the separator characters product codes are written with (`-`, `_`, `.`) by spaces, so
/// the duration token can be matched uniformly.
pub fn normalize_separators(code: &str) -> String {
    code.chars().map(|c| if matches!(c, '-' | '_' | '.') { ' ' } else { c }).collect()
}

/// Extracts the duration descriptor embedded in a product code and resolves it to a month count.
///
/// Recognised spellings, case-insensitive, after separator normalisation: `3thang`, `3 thang`,
/// `3th`, `3t`, `3m`, `3 month(s)`. Returns `None` when the code carries no duration.
pub fn months_from_string(product_code: &str) -> Option<u32> {
    let normalized = normalize_separators(product_code);
    let re = Regex::new(r"(?i)(\d+)\s*(?:thang|months|month|th|t|m)\b").expect("duration pattern is valid");
    re.captures(&normalized).and_then(|caps| caps.get(1)).and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Month count to renewal days. A flat 30 days per month, matching how the storefront has always
/// quoted cycles.
pub fn days_from_months(months: u32) -> i64 {
    i64::from(months) * 30
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn month_descriptors() {
        assert_eq!(months_from_string("NETFLIX-3THANG"), Some(3));
        assert_eq!(months_from_string("SPOTIFY_6 thang"), Some(6));
        assert_eq!(months_from_string("YTB.1T"), Some(1));
        assert_eq!(months_from_string("CANVA 12m"), Some(12));
        assert_eq!(months_from_string("OFFICE 2 months"), Some(2));
        assert_eq!(months_from_string("NETFLIX"), None);
        assert_eq!(months_from_string(""), None);
    }

    #[test]
    fn day_resolution() {
        assert_eq!(days_from_months(1), 30);
        assert_eq!(days_from_months(3), 90);
        assert_eq!(days_from_months(12), 360);
    }
}
