/// The pricing channel an order was sold through, selected by the order code's prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceChannel {
    /// Cooperator resellers; sell price = cost × pct_ctv.
    Cooperator,
    /// Retail customers; sell price = cost × pct_ctv × pct_khach.
    Retail,
    /// Direct sales at cost.
    Standard,
}

/// The fixed order-code prefixes and the channel each one selects. Checked in order, so longer
/// prefixes must come first.
pub const ORDER_PREFIXES: [(&str, PriceChannel); 3] =
    [("CTV", PriceChannel::Cooperator), ("KH", PriceChannel::Retail), ("DH", PriceChannel::Standard)];

/// Classifies an order code by its channel prefix. Unrecognised prefixes fall back to
/// [`PriceChannel::Standard`] pricing (cost unchanged).
pub fn channel_for_code(code: &str) -> PriceChannel {
    let upper = code.trim().to_uppercase();
    ORDER_PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, channel)| *channel)
        .unwrap_or(PriceChannel::Standard)
}
