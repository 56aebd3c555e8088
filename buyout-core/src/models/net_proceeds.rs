use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net proceeds of a sale at the low and high ends of the vehicle value band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetProceedsRange {
    /// `value_low` minus the buyout cost base. May be negative.
    pub low: Decimal,
    /// `value_high` minus the buyout cost base.
    pub high: Decimal,
    /// Vehicle value at the bottom of the band.
    pub value_low: Decimal,
    /// Vehicle value at the top of the band.
    pub value_high: Decimal,
}
