//! Record assembly and the plain-text rendering used by the record log's
//! copy and export actions.

use chrono::{DateTime, Local};

use crate::calculations::quote::{OutputVisibility, QuoteBreakdown};
use crate::format::{currency_string, display_timestamp, filename_timestamp, percentage_string};
use crate::models::{PricingMode, QuoteForm, QuoteRecord};

/// Separator between record blocks in a multi-record export.
pub const EXPORT_RULE: &str = "==================================================";

/// Picks the id for a new record: wall-clock milliseconds, bumped past the
/// newest existing id so ids stay unique and increasing even when two
/// records land in the same millisecond.
pub fn next_record_id(existing: &[QuoteRecord], now_millis: i64) -> i64 {
    let newest = existing.iter().map(|r| r.id).max().unwrap_or(0);
    now_millis.max(newest + 1)
}

/// Assembles the persisted snapshot for one completed quote.
pub fn build_record(
    id: i64,
    saved_at: DateTime<Local>,
    form: &QuoteForm,
    breakdown: &QuoteBreakdown,
) -> QuoteRecord {
    QuoteRecord {
        id,
        saved_at: display_timestamp(saved_at),
        file_stamp: filename_timestamp(saved_at),
        company_name: form.company_name.clone(),
        erp_link: form.erp_link.clone(),
        last_year_price: form.last_year_price,
        msrp_total: form.msrp_total,
        integrations_selected: form.integrations_selected,
        mode: form.mode,
        discount_percentage: form.discount_percentage,
        increase_percentage: form.increase_percentage,
        notes: form.notes.clone(),
        integrations_cost: breakdown.integrations_cost,
        discount_for_erp: breakdown.discount_for_erp,
        total_end_price: breakdown.total_end_price,
    }
}

/// Renders one record as labeled lines in a fixed order.
///
/// Currency and percentage values go back through the shared renderers, so
/// the text matches what the calculator displayed. Conditional lines follow
/// the same visibility rules as the calculator outputs.
pub fn render_record(record: &QuoteRecord) -> String {
    let visibility = OutputVisibility::for_selection(record.mode, record.integrations_selected);
    let mut lines = Vec::new();

    lines.push(format!("Company Name: {}", record.company_name));
    if let Some(link) = record.erp_link.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("ERP Link: {link}"));
    }
    lines.push(format!(
        "Last Year Price: {}",
        currency_string(record.last_year_price)
    ));
    lines.push(format!("MSRP Total: {}", currency_string(record.msrp_total)));
    lines.push(format!(
        "Integrations Selected: {}",
        if record.integrations_selected { "Yes" } else { "No" }
    ));
    lines.push(format!(
        "Discount/Increase Selected: {}",
        record.mode.label()
    ));
    match record.mode {
        PricingMode::Increase => {
            let pct = record.increase_percentage.unwrap_or_default();
            lines.push(format!("Increase Percentage: {}", percentage_string(pct)));
        }
        PricingMode::Discount => {
            let pct = record.discount_percentage.unwrap_or_default();
            lines.push(format!("Discount Percentage: {}", percentage_string(pct)));
        }
        PricingMode::NoAdjustment => {}
    }

    lines.push("Calculated Values:".to_string());
    if visibility.integrations_cost {
        lines.push(format!(
            "Integrations Cost: {}",
            currency_string(record.integrations_cost)
        ));
    }
    if visibility.erp_outputs {
        lines.push(format!(
            "Discount for ERP: {}",
            percentage_string(record.discount_for_erp)
        ));
        lines.push(format!(
            "Total End Price: {}",
            currency_string(record.total_end_price)
        ));
    }
    lines.push(format!("Notes: {}", record.notes));

    lines.join("\n")
}

/// Renders every record for a file export: an export-date header followed
/// by the record blocks, separated by a rule line.
pub fn render_export(records: &[QuoteRecord], exported_at: &str) -> String {
    let mut out = format!("Quote Records Export - {exported_at}\n");
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            out.push_str(EXPORT_RULE);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&render_record(record));
        out.push('\n');
    }
    out
}

/// File name for an exported record log.
pub fn export_file_name(stamp: &str) -> String {
    format!("quote_records_{stamp}.txt")
}
