//! Prorated credit engine.
//!
//! Computes how much unused value remains on a license purchase as of a
//! reference date ("today" or a user-chosen date), either for a single
//! purchase or across a schedule of independent line items, and derives the
//! balance owed on an upgrade.
//!
//! The daily rate divides the purchase amount by `years × 365` flat days,
//! while the expiration date uses real calendar arithmetic. The mismatch
//! over leap days is long-standing, intentional behavior.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use luna_core::calculations::{CreditTerms, assess_credit};
//! use luna_core::models::ContractDuration;
//!
//! let terms = CreditTerms {
//!     amount: dec!(3650.00),
//!     purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1),
//!     duration: ContractDuration::OneYear,
//!     reference_date: NaiveDate::from_ymd_opt(2024, 7, 1),
//! };
//!
//! let standing = assess_credit(&terms);
//!
//! assert!(standing.computable);
//! assert_eq!(standing.credit_per_day, dec!(10.00));
//! assert_eq!(standing.days_remaining, 184);
//! assert_eq!(standing.total_credit, dec!(1840.00));
//! ```

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::models::{ContractDuration, CreditLine};

/// Inputs for a single-purchase credit calculation.
///
/// `None` dates model empty or unparseable field input; the engine degrades
/// to a non-computable standing instead of erroring. The reference date is
/// resolved by the caller; the engine never reads the wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTerms {
    /// Original purchase amount.
    pub amount: Decimal,

    /// Date the license was purchased.
    pub purchase_date: Option<NaiveDate>,

    /// Contract length (1-3 years).
    pub duration: ContractDuration,

    /// The "as of" date for the remaining-days count.
    pub reference_date: Option<NaiveDate>,
}

/// Result of a single-purchase credit calculation.
///
/// When `computable` is false every numeric field is zero and there is no
/// expiration date; the presentation layer renders those as "N/A".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditStanding {
    /// False when the amount or either date made the calculation impossible.
    pub computable: bool,

    /// Purchase date plus the contract duration, calendar years.
    pub expiration_date: Option<NaiveDate>,

    /// Whole days from the reference date to expiration, floored at zero.
    pub days_remaining: i64,

    /// Amount divided by the flat 365-day term.
    pub credit_per_day: Decimal,

    /// Remaining credit: per-day rate × days remaining.
    pub total_credit: Decimal,
}

impl CreditStanding {
    fn not_computable() -> Self {
        Self {
            computable: false,
            expiration_date: None,
            days_remaining: 0,
            credit_per_day: Decimal::ZERO,
            total_credit: Decimal::ZERO,
        }
    }
}

/// One line's standing within a multi-line schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLineStanding {
    /// False when the line's amount or start date made it uncomputable.
    /// Invalid lines contribute zero credit but never abort the others.
    pub valid: bool,

    /// The line's own expiration: the user-supplied end date when present,
    /// else start date plus duration.
    pub end_date: Option<NaiveDate>,

    /// Whole days from start to end; the line's own proration denominator.
    pub term_days: i64,

    pub credit_per_day: Decimal,
    pub days_remaining: i64,

    /// Per-day rate × days remaining, rounded to cents.
    pub credit: Decimal,
}

impl CreditLineStanding {
    fn invalid() -> Self {
        Self {
            valid: false,
            end_date: None,
            term_days: 0,
            credit_per_day: Decimal::ZERO,
            days_remaining: 0,
            credit: Decimal::ZERO,
        }
    }
}

/// Result of a multi-line credit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScheduleStanding {
    /// Per-line standings, in input order.
    pub lines: Vec<CreditLineStanding>,

    /// Sum of every line's rounded credit. Invalid lines contribute zero.
    pub total_credit: Decimal,
}

/// Adds the contract duration to a start date in calendar years.
///
/// Month and day are preserved where the calendar allows; a Feb 29 start
/// lands on Feb 28 in a non-leap expiration year.
pub fn contract_expiration(start: NaiveDate, duration: ContractDuration) -> NaiveDate {
    match start.checked_add_months(Months::new(duration.years() * 12)) {
        Some(date) => date,
        None => {
            warn!(%start, %duration, "expiration date out of range; clamping");
            NaiveDate::MAX
        }
    }
}

/// Computes the remaining credit for a single purchase.
///
/// Returns the non-computable sentinel when the amount is not positive or
/// either date is missing; otherwise all fields are populated. Reported
/// fields are rounded to cents, with the total computed from the unrounded
/// per-day rate.
pub fn assess_credit(terms: &CreditTerms) -> CreditStanding {
    let Some(purchase_date) = terms.purchase_date else {
        warn!("credit calculation skipped: no valid purchase date");
        return CreditStanding::not_computable();
    };
    let Some(reference_date) = terms.reference_date else {
        warn!("credit calculation skipped: no valid reference date");
        return CreditStanding::not_computable();
    };
    if terms.amount <= Decimal::ZERO {
        warn!(amount = %terms.amount, "credit calculation skipped: amount not positive");
        return CreditStanding::not_computable();
    }

    let expiration_date = contract_expiration(purchase_date, terms.duration);
    let days_remaining = expiration_date
        .signed_duration_since(reference_date)
        .num_days()
        .max(0);
    let per_day = terms.amount / Decimal::from(terms.duration.term_days());
    let total_credit = per_day * Decimal::from(days_remaining);

    CreditStanding {
        computable: true,
        expiration_date: Some(expiration_date),
        days_remaining,
        credit_per_day: round_half_up(per_day),
        total_credit: round_half_up(total_credit),
    }
}

/// Computes the remaining credit across a schedule of independent lines.
///
/// Each line prorates against its own start/end span rather than a flat
/// year count. A missing reference date invalidates every line; an invalid
/// line contributes exactly zero without affecting its neighbors. The grand
/// total is the sum of the per-line rounded credits.
pub fn assess_schedule(
    lines: &[CreditLine],
    reference_date: Option<NaiveDate>,
) -> CreditScheduleStanding {
    let standings: Vec<CreditLineStanding> = lines
        .iter()
        .map(|line| assess_line(line, reference_date))
        .collect();
    let total_credit = standings.iter().map(|s| s.credit).sum();

    CreditScheduleStanding {
        lines: standings,
        total_credit,
    }
}

fn assess_line(line: &CreditLine, reference_date: Option<NaiveDate>) -> CreditLineStanding {
    let Some(reference_date) = reference_date else {
        return CreditLineStanding::invalid();
    };
    let Some(start_date) = line.start_date else {
        warn!(label = %line.label, "schedule line skipped: no valid start date");
        return CreditLineStanding::invalid();
    };
    if line.amount <= Decimal::ZERO {
        warn!(label = %line.label, amount = %line.amount, "schedule line skipped: amount not positive");
        return CreditLineStanding::invalid();
    }

    let end_date = line
        .end_date
        .unwrap_or_else(|| contract_expiration(start_date, line.duration));
    let term_days = end_date.signed_duration_since(start_date).num_days();
    let per_day = if term_days > 0 {
        line.amount / Decimal::from(term_days)
    } else {
        warn!(label = %line.label, term_days, "schedule line has no positive term; zero rate");
        Decimal::ZERO
    };
    let days_remaining = end_date
        .signed_duration_since(reference_date)
        .num_days()
        .max(0);

    CreditLineStanding {
        valid: true,
        end_date: Some(end_date),
        term_days,
        credit_per_day: round_half_up(per_day),
        days_remaining,
        credit: round_half_up(per_day * Decimal::from(days_remaining)),
    }
}

/// Balance owed on a license upgrade: the new license cost minus the
/// remaining credit, floored at zero. A missing or non-positive cost owes
/// nothing.
pub fn upgrade_balance(new_license_cost: Decimal, total_credit: Decimal) -> Decimal {
    if new_license_cost <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(floor_at_zero(new_license_cost - total_credit))
}
