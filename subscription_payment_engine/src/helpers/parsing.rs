use chrono::NaiveDate;

/// Maps Vietnamese accented characters to their ASCII base letter. Input should already be
/// lowercased; characters outside the Vietnamese alphabet pass through unchanged.
pub fn strip_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ' | 'ẩ' | 'ẫ' | 'ậ' => 'a',
            'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' => 'e',
            'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' => 'i',
            'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở' | 'ỡ' | 'ợ' => 'o',
            'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' => 'u',
            'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
            'đ' => 'd',
            other => other,
        })
        .collect()
}

/// Normalises a transfer amount to whole dong.
///
/// Providers send amounts as numbers or strings with currency noise. Everything after a decimal
/// point is discarded (dong has no fractional unit) and any remaining non-digit, non-minus bytes
/// are stripped. Returns `None` when no digits survive.
pub fn clean_amount(raw: &str) -> Option<i64> {
    let whole = raw.split('.').next().unwrap_or(raw);
    let cleaned: String = whole.chars().filter(|c| c.is_ascii_digit() || *c == '-').collect();
    cleaned.parse::<i64>().ok()
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Parses a loosely formatted date or timestamp. Timestamps may separate the date and time parts
/// with a space or a `T`; only the date part is kept.
pub fn parse_date_flexible(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Formats a date the way the back office reads it: `DD/MM/YYYY`.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
