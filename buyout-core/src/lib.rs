pub mod calculations;
pub mod currency;
pub mod models;

pub use calculations::{BuyoutCalculator, VALUE_UNCERTAINTY, calculate};
pub use currency::{format_currency, parse_currency};
pub use models::*;
