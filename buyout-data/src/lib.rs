//! Regional sales tax rates for the lease buyout calculator.
//!
//! The calculator takes a plain tax rate; this crate is where that rate
//! comes from. It ships the combined GST/PST/HST rates of every Canadian
//! province and territory and can load a replacement table from CSV.

pub mod loader;
pub mod provinces;

pub use loader::{ProvinceRateLoader, ProvinceRateLoaderError, ProvinceRecord};
pub use provinces::{DEFAULT_PROVINCE, ProvinceInfo, ProvinceTable, TaxType, format_tax_rate};
