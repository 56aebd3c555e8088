//! Lease buyout calculations.
//!
//! Every function here is a pure transformation of [`Decimal`](rust_decimal::Decimal)
//! amounts. None of them validate their inputs: negative or zero amounts are
//! computed like any other value so that half-typed form input never fails.

pub mod buyout;
pub mod common;

pub use buyout::{
    BuyoutCalculator, VALUE_UNCERTAINTY, break_even_offer, calculate, cost_base, equity,
    net_proceeds_range, tax_savings, total_buyout_cost,
};
