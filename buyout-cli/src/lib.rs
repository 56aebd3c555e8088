//! Command-line front end for the lease buyout calculator.
//!
//! The binary in `main.rs` is a thin shell over [`app`]; everything here is
//! usable from tests without spawning a process.

pub mod analytics;
pub mod app;
pub mod config;
pub mod logging;
pub mod report;
pub mod state;
pub mod summary;
