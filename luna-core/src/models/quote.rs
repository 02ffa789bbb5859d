use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price-adjustment selection for a quote. Exactly one is active at a time.
///
/// `Discount` survives only for older saved records; the current input
/// surface can no longer select it, but stored quotes that carry it must
/// still deserialize and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    Increase,
    Discount,
    #[serde(rename = "none")]
    NoAdjustment,
}

impl PricingMode {
    /// Display label used in rendered record text.
    pub fn label(self) -> &'static str {
        match self {
            PricingMode::Increase => "Increase",
            PricingMode::Discount => "Discount",
            PricingMode::NoAdjustment => "None",
        }
    }

    /// True for the legacy selection that new input can no longer produce.
    pub fn is_legacy(self) -> bool {
        matches!(self, PricingMode::Discount)
    }
}

/// Everything the user supplies for one quote calculation.
///
/// Populated once per recalculation from the raw field values and passed by
/// reference to the pricing engine; the engine never reads live input state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteForm {
    pub company_name: String,
    pub erp_link: Option<String>,
    pub last_year_price: Decimal,
    pub msrp_total: Decimal,
    pub integrations_selected: bool,
    pub mode: PricingMode,
    /// Relevant only when `mode` is `Discount` (legacy records).
    pub discount_percentage: Option<Decimal>,
    /// Relevant only when `mode` is `Increase`.
    pub increase_percentage: Option<Decimal>,
    pub notes: String,
}

/// A persisted snapshot of one completed quote: inputs plus calculated
/// values plus timestamps. Records are append-only; they are created once,
/// listed newest-first, and deleted by id, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Time-based unique id, strictly increasing across a session.
    pub id: i64,
    /// Human-readable creation timestamp, e.g. `8/5/2026, 2:30:15 PM`.
    pub saved_at: String,
    /// Sortable creation stamp used in export file names, `YYYYMMDD_HHMMSS`.
    pub file_stamp: String,

    // User-provided values
    pub company_name: String,
    pub erp_link: Option<String>,
    pub last_year_price: Decimal,
    pub msrp_total: Decimal,
    pub integrations_selected: bool,
    pub mode: PricingMode,
    pub discount_percentage: Option<Decimal>,
    pub increase_percentage: Option<Decimal>,
    pub notes: String,

    // Calculated values
    pub integrations_cost: Decimal,
    pub discount_for_erp: Decimal,
    pub total_end_price: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pricing_mode_serializes_to_legacy_wire_names() {
        let json = |m: PricingMode| serde_json::to_string(&m).unwrap();

        assert_eq!(json(PricingMode::Increase), "\"increase\"");
        assert_eq!(json(PricingMode::Discount), "\"discount\"");
        assert_eq!(json(PricingMode::NoAdjustment), "\"none\"");
    }

    #[test]
    fn pricing_mode_deserializes_none_from_older_records() {
        let mode: PricingMode = serde_json::from_str("\"none\"").unwrap();

        assert_eq!(mode, PricingMode::NoAdjustment);
    }

    #[test]
    fn discount_is_the_only_legacy_mode() {
        assert!(PricingMode::Discount.is_legacy());
        assert!(!PricingMode::Increase.is_legacy());
        assert!(!PricingMode::NoAdjustment.is_legacy());
    }

    #[test]
    fn labels_match_display_wording() {
        assert_eq!(PricingMode::Increase.label(), "Increase");
        assert_eq!(PricingMode::Discount.label(), "Discount");
        assert_eq!(PricingMode::NoAdjustment.label(), "None");
    }
}
