use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract length of a license purchase. Only one-, two- and three-year
/// terms exist; anything else is rejected at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum ContractDuration {
    OneYear,
    TwoYears,
    ThreeYears,
}

impl ContractDuration {
    pub fn years(self) -> u32 {
        match self {
            ContractDuration::OneYear => 1,
            ContractDuration::TwoYears => 2,
            ContractDuration::ThreeYears => 3,
        }
    }

    /// The per-day denominator for prorating, `years × 365`.
    ///
    /// This deliberately ignores leap days: the expiration date itself uses
    /// real calendar arithmetic, but the daily rate has always been computed
    /// against flat 365-day years.
    pub fn term_days(self) -> i64 {
        i64::from(self.years()) * 365
    }

    pub fn from_years(years: u32) -> Option<Self> {
        match years {
            1 => Some(ContractDuration::OneYear),
            2 => Some(ContractDuration::TwoYears),
            3 => Some(ContractDuration::ThreeYears),
            _ => None,
        }
    }
}

impl From<ContractDuration> for u32 {
    fn from(duration: ContractDuration) -> u32 {
        duration.years()
    }
}

impl TryFrom<u32> for ContractDuration {
    type Error = String;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        ContractDuration::from_years(years)
            .ok_or_else(|| format!("contract duration must be 1-3 years, got {years}"))
    }
}

impl fmt::Display for ContractDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractDuration::OneYear => write!(f, "1 year"),
            ContractDuration::TwoYears => write!(f, "2 years"),
            ContractDuration::ThreeYears => write!(f, "3 years"),
        }
    }
}

/// One entry in the multi-line credit view, with its own amount and dates
/// independent of the other lines.
///
/// `start_date` is `None` when the field was empty or unparseable; such a
/// line contributes zero credit without aborting the rest of the schedule.
/// `end_date` overrides the derived `start + duration` expiration when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLine {
    pub label: String,
    pub amount: Decimal,
    pub start_date: Option<NaiveDate>,
    pub duration: ContractDuration,
    pub end_date: Option<NaiveDate>,
}
