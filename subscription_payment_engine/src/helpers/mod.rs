//! Pure helper functions: free-text heuristics for bank-transfer content, loose date and amount
//! parsing, duration descriptors and channel prefixes. Nothing in here touches the database.

mod code_extractor;
mod durations;
mod parsing;
mod prefixes;

pub use code_extractor::{extract_order_codes, split_code_and_sender};
pub use durations::{days_from_months, months_from_string, normalize_separators};
pub use parsing::{clean_amount, format_dmy, parse_date_flexible, strip_diacritics};
pub use prefixes::{channel_for_code, PriceChannel, ORDER_PREFIXES};
