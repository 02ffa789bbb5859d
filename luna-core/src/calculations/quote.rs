//! Quote pricing engine.
//!
//! Computes the three derived figures of a quote: the integration cost, the
//! new total end price after a year-over-year increase, and the percentage
//! delta an ERP system needs relative to MSRP.
//!
//! # Calculation steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Clamp last-year price and MSRP total to ≥ 0 |
//! | 2    | Integration cost: MSRP × integration rate (only when selected) |
//! | 3    | Clamp increase percentage to [0, cap] |
//! | 4    | Price change: last-year price × increase% / 100 |
//! | 5    | Total end price: last-year price + price change |
//! | 6    | ERP base: MSRP × (1 + rate) when integrations are selected, else MSRP |
//! | 7    | ERP delta: (total end price / ERP base − 1) × 100, 0 when the base is 0 |
//!
//! Steps 3-7 only apply in increase mode. The discount selection survives in
//! stored data but computes nothing; it and the no-adjustment selection
//! deterministically return zeros, and the presentation layer hides the
//! fields instead of special-casing the engine.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use luna_core::calculations::{PricingRates, QuoteFigures, QuotePricer};
//! use luna_core::models::PricingMode;
//!
//! let pricer = QuotePricer::new(PricingRates::default());
//! let figures = QuoteFigures {
//!     last_year_price: dec!(100.00),
//!     msrp_total: dec!(1000.00),
//!     integrations_active: true,
//!     mode: PricingMode::Increase,
//!     increase_percentage: dec!(10.00),
//! };
//!
//! let breakdown = pricer.calculate(&figures).unwrap();
//!
//! // Integration cost: 1000 × 20% = 200
//! assert_eq!(breakdown.integrations_cost, dec!(200.00));
//! // Total: 100 + 10% = 110
//! assert_eq!(breakdown.total_end_price, dec!(110.00));
//! // ERP delta: (110 / 1200 − 1) × 100
//! assert_eq!(breakdown.discount_for_erp, dec!(-90.83));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::models::PricingMode;

/// Errors that can occur when validating pricing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The integration rate must be between 0 and 1.
    #[error("integration rate must be between 0 and 1, got {0}")]
    InvalidIntegrationRate(Decimal),

    /// The increase percentage cap must be non-negative.
    #[error("increase percentage cap must be non-negative, got {0}")]
    InvalidIncreaseCap(Decimal),
}

/// Fixed business rates for quote pricing.
///
/// These are product constants, not user input: the integration surcharge
/// has always been 20% of MSRP and increase percentages are capped at 1000.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRates {
    /// Fraction of the MSRP total charged for integrations (0.20 = 20%).
    pub integration_rate: Decimal,

    /// Upper bound applied to the user-entered increase percentage.
    pub increase_cap: Decimal,
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            integration_rate: Decimal::new(20, 2),
            increase_cap: Decimal::from(1000),
        }
    }
}

impl PricingRates {
    /// Validates the rate values.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] if the integration rate is outside [0, 1]
    /// or the increase cap is negative.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.integration_rate < Decimal::ZERO || self.integration_rate > Decimal::ONE {
            return Err(PricingError::InvalidIntegrationRate(self.integration_rate));
        }
        if self.increase_cap < Decimal::ZERO {
            return Err(PricingError::InvalidIncreaseCap(self.increase_cap));
        }
        Ok(())
    }
}

/// Numeric inputs for one quote recalculation.
///
/// Built once per recalculation from the current form values and passed by
/// reference; the engine never queries input fields itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteFigures {
    /// What the company paid last year.
    pub last_year_price: Decimal,

    /// Current MSRP total for the company's license set.
    pub msrp_total: Decimal,

    /// Whether the integrations surcharge applies.
    pub integrations_active: bool,

    /// Which price adjustment is selected.
    pub mode: PricingMode,

    /// User-entered increase percentage; clamped to [0, cap] before use.
    pub increase_percentage: Decimal,
}

/// Derived figures for a quote.
///
/// Fully determined by [`QuoteFigures`] and [`PricingRates`].
/// `price_change_amount` is an intermediate reported for transparency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    /// Integration surcharge in dollars; 0 when integrations are off.
    pub integrations_cost: Decimal,

    /// Dollar amount added on top of last year's price.
    pub price_change_amount: Decimal,

    /// Last year's price plus the price change.
    pub total_end_price: Decimal,

    /// Percentage delta between the total end price and the ERP base,
    /// negative when the total sits below the base.
    pub discount_for_erp: Decimal,
}

impl QuoteBreakdown {
    fn zeros_with_integrations(integrations_cost: Decimal) -> Self {
        Self {
            integrations_cost,
            price_change_amount: Decimal::ZERO,
            total_end_price: Decimal::ZERO,
            discount_for_erp: Decimal::ZERO,
        }
    }
}

/// Which computed fields the presentation layer should show for a given
/// selection. Owned by presentation, defined centrally so the record
/// renderer and any front end agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputVisibility {
    /// Show the integration cost field.
    pub integrations_cost: bool,
    /// Show the ERP delta and total end price fields.
    pub erp_outputs: bool,
}

impl OutputVisibility {
    pub fn for_selection(mode: PricingMode, integrations_active: bool) -> Self {
        let erp_outputs = mode == PricingMode::Increase;
        Self {
            integrations_cost: integrations_active && erp_outputs,
            erp_outputs,
        }
    }
}

/// Calculator for quote pricing.
///
/// Encapsulates the fixed rates and computes a [`QuoteBreakdown`] per call.
/// The calculation is total and side-effect free.
#[derive(Debug, Clone)]
pub struct QuotePricer {
    rates: PricingRates,
}

impl QuotePricer {
    pub fn new(rates: PricingRates) -> Self {
        Self { rates }
    }

    /// Calculates the full breakdown for one set of figures.
    ///
    /// Negative money inputs are clamped to zero and the increase
    /// percentage is clamped into [0, cap], each with a logged warning.
    /// Selections other than increase return zeros deterministically.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] only if the configured rates are invalid.
    pub fn calculate(&self, figures: &QuoteFigures) -> Result<QuoteBreakdown, PricingError> {
        self.rates.validate()?;

        let last_year_price = self.non_negative("last year price", figures.last_year_price);
        let msrp_total = self.non_negative("MSRP total", figures.msrp_total);

        let integrations_cost = self.integrations_cost(msrp_total, figures.integrations_active);

        if figures.mode != PricingMode::Increase {
            return Ok(QuoteBreakdown::zeros_with_integrations(integrations_cost));
        }

        let increase_percentage = self.clamped_increase(figures.increase_percentage);
        let price_change_amount = self.price_change(last_year_price, increase_percentage);
        let total_end_price = round_half_up(last_year_price + price_change_amount);
        let erp_base = self.erp_base(msrp_total, figures.integrations_active);
        let discount_for_erp = self.erp_delta(total_end_price, erp_base);

        Ok(QuoteBreakdown {
            integrations_cost,
            price_change_amount,
            total_end_price,
            discount_for_erp,
        })
    }

    fn non_negative(&self, field: &'static str, value: Decimal) -> Decimal {
        if value < Decimal::ZERO {
            warn!(field, value = %value, "negative money input clamped to zero");
        }
        floor_at_zero(value)
    }

    /// Step 2: integration surcharge, MSRP × rate when selected.
    fn integrations_cost(&self, msrp_total: Decimal, integrations_active: bool) -> Decimal {
        if !integrations_active {
            return Decimal::ZERO;
        }
        round_half_up(msrp_total * self.rates.integration_rate)
    }

    /// Step 3: clamp the user-entered increase percentage into [0, cap].
    fn clamped_increase(&self, increase_percentage: Decimal) -> Decimal {
        if increase_percentage < Decimal::ZERO {
            warn!(value = %increase_percentage, "negative increase percentage clamped to zero");
            return Decimal::ZERO;
        }
        if increase_percentage > self.rates.increase_cap {
            warn!(
                value = %increase_percentage,
                cap = %self.rates.increase_cap,
                "increase percentage clamped to cap"
            );
            return self.rates.increase_cap;
        }
        increase_percentage
    }

    /// Step 4: dollar change, last-year price × increase% / 100.
    fn price_change(&self, last_year_price: Decimal, increase_percentage: Decimal) -> Decimal {
        round_half_up(last_year_price * increase_percentage / Decimal::ONE_HUNDRED)
    }

    /// Step 6: the MSRP base the ERP delta is measured against. Includes
    /// the integration surcharge when integrations are selected.
    fn erp_base(&self, msrp_total: Decimal, integrations_active: bool) -> Decimal {
        if integrations_active {
            msrp_total * (Decimal::ONE + self.rates.integration_rate)
        } else {
            msrp_total
        }
    }

    /// Step 7: percentage delta of the total against the ERP base.
    /// A zero base yields zero rather than a division error.
    fn erp_delta(&self, total_end_price: Decimal, erp_base: Decimal) -> Decimal {
        if erp_base == Decimal::ZERO {
            warn!("ERP base is zero; reporting a zero delta");
            return Decimal::ZERO;
        }
        round_half_up((total_end_price / erp_base - Decimal::ONE) * Decimal::ONE_HUNDRED)
    }
}
