//! Tick-rate conversion.
//!
//! Independent of the clock engine: converts elapsed time and tick counts
//! between arbitrary tick rates.

mod converter;

pub use converter::{RateMode, TickRateConverter};
