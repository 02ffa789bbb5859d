use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::{Args, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::error;

use luna_core::calculations::{
    OutputVisibility, PricingRates, QuoteFigures, QuotePricer, CreditTerms, assess_credit,
    assess_schedule, upgrade_balance,
};
use luna_core::format::{
    currency_string, generate_timestamp, parse_currency, parse_date, parse_percentage,
    percentage_string,
};
use luna_core::models::{ContractDuration, CreditLine, PricingMode, QuoteForm, QuoteRecord, Theme};
use luna_core::records::{build_record, export_file_name, next_record_id, render_export, render_record};

use crate::app::App;

/// Price a quote from raw field values.
///
/// Money flags accept whatever would be typed into the form, decoration
/// included ("1200", "$1,200.00"). Unparseable values count as zero.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Company the quote is for
    #[arg(long)]
    pub company: String,

    /// Link to the company's ERP entry
    #[arg(long)]
    pub erp_link: Option<String>,

    /// What the company paid last year
    #[arg(long, default_value = "")]
    pub last_year_price: String,

    /// Current MSRP total
    #[arg(long, default_value = "")]
    pub msrp_total: String,

    /// Apply the integrations surcharge
    #[arg(long)]
    pub integrations: bool,

    /// Year-over-year increase percentage; omit for no price adjustment
    #[arg(long)]
    pub increase: Option<String>,

    /// Free-form notes saved with the quote
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Append the completed quote to the record log
    #[arg(long)]
    pub save: bool,
}

/// Compute remaining prorated credit.
#[derive(Args, Debug)]
pub struct CreditArgs {
    /// Purchase amount (single-purchase mode)
    #[arg(long)]
    pub amount: Option<String>,

    /// Purchase date, YYYY-MM-DD or MM/DD/YYYY
    #[arg(long)]
    pub purchased: Option<String>,

    /// Contract duration in years (1-3)
    #[arg(long, default_value_t = 1)]
    pub years: u32,

    /// Calculate as of this date instead of today
    #[arg(long)]
    pub on: Option<String>,

    /// New license cost; prints what is still owed after credit
    #[arg(long)]
    pub new_license_cost: Option<String>,

    /// Schedule line LABEL:AMOUNT:START:YEARS[:END]; repeat for each line.
    /// Requires advanced mode.
    #[arg(long = "line")]
    pub lines: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum RecordsAction {
    /// List saved quote records, newest first
    List,
    /// Print one record's full text, as copied from the record log
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Write all records to a text file
    Export {
        /// Output path; defaults to a timestamped file name
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete one record by id
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Delete every record
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the stored preferences
    Show,
    /// Toggle the advanced (multi-line credit) view
    Advanced { state: Toggle },
    /// Pick the color theme
    Theme { theme: ThemeChoice },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Toggle {
    On,
    Off,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ThemeChoice {
    System,
    Light,
    Dark,
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Theme {
        match choice {
            ThemeChoice::System => Theme::System,
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        }
    }
}

pub async fn run_quote(app: &App, args: &QuoteArgs) -> Result<()> {
    let mode = if args.increase.is_some() {
        PricingMode::Increase
    } else {
        PricingMode::NoAdjustment
    };
    let increase_percentage = args.increase.as_deref().and_then(parse_percentage);

    let form = QuoteForm {
        company_name: args.company.clone(),
        erp_link: args.erp_link.clone(),
        last_year_price: parse_currency(&args.last_year_price).unwrap_or_default(),
        msrp_total: parse_currency(&args.msrp_total).unwrap_or_default(),
        integrations_selected: args.integrations,
        mode,
        discount_percentage: None,
        increase_percentage,
        notes: args.notes.clone(),
    };
    let figures = QuoteFigures {
        last_year_price: form.last_year_price,
        msrp_total: form.msrp_total,
        integrations_active: form.integrations_selected,
        mode: form.mode,
        increase_percentage: form.increase_percentage.unwrap_or_default(),
    };

    let pricer = QuotePricer::new(PricingRates::default());
    let breakdown = pricer.calculate(&figures).context("quote pricing failed")?;
    let visibility = OutputVisibility::for_selection(form.mode, form.integrations_selected);

    println!("Quote for {}", form.company_name);
    if visibility.integrations_cost {
        println!("  Integrations Cost: {}", currency_string(breakdown.integrations_cost));
    }
    if visibility.erp_outputs {
        println!("  Price Change: {}", currency_string(breakdown.price_change_amount));
        println!("  Total End Price: {}", currency_string(breakdown.total_end_price));
        println!("  Discount for ERP: {}", percentage_string(breakdown.discount_for_erp));
    } else {
        println!("  No price adjustment selected.");
    }

    if args.save {
        let existing = load_records_best_effort(app).await;
        let now = Local::now();
        let id = next_record_id(&existing, now.timestamp_millis());
        let record = build_record(id, now, &form, &breakdown);
        app.records
            .append_front(record)
            .await
            .context("failed to save the quote record")?;
        println!("Saved record {id}.");
    }

    Ok(())
}

pub async fn run_credit(app: &App, args: &CreditArgs) -> Result<()> {
    let reference_date = match args.on.as_deref() {
        Some(raw) => parse_date(raw),
        None => Some(Local::now().date_naive()),
    };
    let new_license_cost = args.new_license_cost.as_deref().and_then(parse_currency);

    if args.lines.is_empty() {
        run_single_credit(args, reference_date, new_license_cost)
    } else {
        run_schedule_credit(app, args, reference_date, new_license_cost)
    }
}

fn run_single_credit(
    args: &CreditArgs,
    reference_date: Option<chrono::NaiveDate>,
    new_license_cost: Option<Decimal>,
) -> Result<()> {
    let duration = ContractDuration::from_years(args.years)
        .ok_or_else(|| anyhow!("contract duration must be 1-3 years, got {}", args.years))?;
    let terms = CreditTerms {
        amount: args.amount.as_deref().and_then(parse_currency).unwrap_or_default(),
        purchase_date: args.purchased.as_deref().and_then(parse_date),
        duration,
        reference_date,
    };

    let standing = assess_credit(&terms);
    if !standing.computable {
        println!("Credit: N/A (check the amount and dates)");
        return Ok(());
    }

    // Expiration is always present on a computable standing.
    if let Some(expiration) = standing.expiration_date {
        println!("Expiration Date: {}", expiration.format("%-m/%-d/%Y"));
    }
    println!("Days Remaining: {}", standing.days_remaining);
    println!("Credit Per Day: {}", currency_string(standing.credit_per_day));
    println!("Total Credit: {}", currency_string(standing.total_credit));
    print_upgrade(new_license_cost, standing.total_credit);

    Ok(())
}

fn run_schedule_credit(
    app: &App,
    args: &CreditArgs,
    reference_date: Option<chrono::NaiveDate>,
    new_license_cost: Option<Decimal>,
) -> Result<()> {
    if !app.settings.advanced_mode {
        bail!("the multi-line credit view requires advanced mode; enable it with `luna settings advanced on`");
    }

    let lines = args
        .lines
        .iter()
        .map(|raw| parse_credit_line(raw))
        .collect::<Result<Vec<CreditLine>>>()?;

    let schedule = assess_schedule(&lines, reference_date);
    for (line, standing) in lines.iter().zip(&schedule.lines) {
        if !standing.valid {
            println!("{}: N/A", line.label);
            continue;
        }
        println!(
            "{}: {} ({} days left at {}/day)",
            line.label,
            currency_string(standing.credit),
            standing.days_remaining,
            currency_string(standing.credit_per_day),
        );
    }
    println!("Total Credit: {}", currency_string(schedule.total_credit));
    print_upgrade(new_license_cost, schedule.total_credit);

    Ok(())
}

fn print_upgrade(new_license_cost: Option<Decimal>, total_credit: Decimal) {
    if let Some(cost) = new_license_cost.filter(|c| *c > Decimal::ZERO) {
        println!("What They Owe: {}", currency_string(upgrade_balance(cost, total_credit)));
    }
}

pub async fn run_records(app: &App, action: &RecordsAction) -> Result<()> {
    match action {
        RecordsAction::List => {
            let records = load_records_best_effort(app).await;
            if records.is_empty() {
                println!("No records saved.");
                return Ok(());
            }
            for record in &records {
                println!(
                    "{}  {}  {}  {}",
                    record.id,
                    record.saved_at,
                    record.company_name,
                    currency_string(record.total_end_price),
                );
            }
            Ok(())
        }
        RecordsAction::Show { id } => {
            let records = load_records_best_effort(app).await;
            match records.iter().find(|r| r.id == *id) {
                Some(record) => println!("{}", render_record(record)),
                None => println!("No record with id {id}."),
            }
            Ok(())
        }
        RecordsAction::Export { out } => {
            let records = load_records_best_effort(app).await;
            if records.is_empty() {
                println!("No records to export.");
                return Ok(());
            }
            let text = render_export(&records, &generate_timestamp(false));
            let path = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(export_file_name(&generate_timestamp(true))));
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            println!("Exported {} record(s) to {}.", records.len(), path.display());
            Ok(())
        }
        RecordsAction::Delete { id } => {
            let removed = app
                .records
                .delete(*id)
                .await
                .context("failed to delete the record")?;
            if removed {
                println!("Deleted record {id}.");
            } else {
                println!("No record with id {id}.");
            }
            Ok(())
        }
        RecordsAction::Clear => {
            app.records
                .clear()
                .await
                .context("failed to clear the record log")?;
            println!("Record log cleared.");
            Ok(())
        }
    }
}

pub async fn run_settings(app: &mut App, action: &SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            println!(
                "Advanced mode: {}",
                if app.settings.advanced_mode { "on" } else { "off" }
            );
            println!("Theme: {:?}", app.settings.theme);
            Ok(())
        }
        SettingsAction::Advanced { state } => {
            app.settings.advanced_mode = matches!(state, Toggle::On);
            app.settings_store
                .save(&app.settings)
                .await
                .context("failed to save settings")?;
            println!(
                "Advanced mode is now {}.",
                if app.settings.advanced_mode { "on" } else { "off" }
            );
            Ok(())
        }
        SettingsAction::Theme { theme } => {
            app.settings.theme = (*theme).into();
            app.settings_store
                .save(&app.settings)
                .await
                .context("failed to save settings")?;
            println!("Theme is now {:?}.", app.settings.theme);
            Ok(())
        }
    }
}

/// Parses one `--line` value: LABEL:AMOUNT:START:YEARS[:END].
///
/// The amount and dates degrade like any other field input (unparseable →
/// missing, line computes as invalid); only a malformed shape or an
/// impossible duration is an argument error.
fn parse_credit_line(raw: &str) -> Result<CreditLine> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 4 || parts.len() > 5 {
        bail!("expected LABEL:AMOUNT:START:YEARS[:END], got '{raw}'");
    }
    let years: u32 = parts[3]
        .trim()
        .parse()
        .with_context(|| format!("invalid year count in '{raw}'"))?;
    let duration = ContractDuration::from_years(years)
        .ok_or_else(|| anyhow!("contract duration must be 1-3 years, got {years}"))?;

    Ok(CreditLine {
        label: parts[0].trim().to_string(),
        amount: parse_currency(parts[1]).unwrap_or_default(),
        start_date: parse_date(parts[2]),
        duration,
        end_date: parts.get(4).and_then(|s| parse_date(s)),
    })
}

async fn load_records_best_effort(app: &App) -> Vec<QuoteRecord> {
    match app.records.load().await {
        Ok(records) => records,
        Err(error) => {
            error!(%error, "could not load the record log; continuing with an empty list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_credit_line_reads_all_fields() {
        let line = parse_credit_line("CRM:3650:2024-01-01:1:2025-06-30").unwrap();

        assert_eq!(line.label, "CRM");
        assert_eq!(line.amount, dec!(3650));
        assert_eq!(line.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(line.duration, ContractDuration::OneYear);
        assert_eq!(line.end_date, NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn parse_credit_line_end_date_is_optional() {
        let line = parse_credit_line("CRM:3650:2024-01-01:2").unwrap();

        assert_eq!(line.duration, ContractDuration::TwoYears);
        assert_eq!(line.end_date, None);
    }

    #[test]
    fn parse_credit_line_accepts_decorated_amounts() {
        let line = parse_credit_line("CRM:$3,650.00:2024-01-01:1").unwrap();

        assert_eq!(line.amount, dec!(3650.00));
    }

    #[test]
    fn parse_credit_line_degrades_bad_amount_and_date_to_missing() {
        let line = parse_credit_line("CRM:lots:soon:1").unwrap();

        assert_eq!(line.amount, dec!(0));
        assert_eq!(line.start_date, None);
    }

    #[test]
    fn parse_credit_line_rejects_a_malformed_shape() {
        assert!(parse_credit_line("CRM:3650").is_err());
        assert!(parse_credit_line("a:b:c:d:e:f").is_err());
    }

    #[test]
    fn parse_credit_line_rejects_impossible_durations() {
        assert!(parse_credit_line("CRM:3650:2024-01-01:7").is_err());
        assert!(parse_credit_line("CRM:3650:2024-01-01:zero").is_err());
    }
}
