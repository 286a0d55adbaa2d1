mod vnd;

pub mod op;
mod secret;

pub use vnd::{Vnd, VndConversionError};
pub use secret::Secret;

mod helpers;
pub use helpers::parse_boolean_flag;
