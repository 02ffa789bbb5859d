//! Calculation engines for the quote and credit calculators.
//!
//! Each engine is a pure function block over typed inputs: same inputs,
//! same outputs, no storage access, no wall-clock reads.

pub mod common;
pub mod credit;
pub mod quote;

pub use credit::{
    CreditLineStanding, CreditScheduleStanding, CreditStanding, CreditTerms, assess_credit,
    assess_schedule, upgrade_balance,
};
pub use quote::{
    OutputVisibility, PricingError, PricingRates, QuoteBreakdown, QuoteFigures, QuotePricer,
};
