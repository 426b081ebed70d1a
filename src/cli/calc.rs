use super::ui;
use crate::core::config::AppConfig;
use crate::core::{
    CalculationRequest, CalculationResult, ScenarioMode, SeriesProvider, calculate,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell};
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use tracing::{debug, info};

/// Options of the `calc` command. Unset values come from the config defaults.
#[derive(Debug, Clone)]
pub struct CalcOptions {
    pub mode: Option<ScenarioMode>,
    pub principal: Option<f64>,
    pub fixed_rate: Option<f64>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub json: bool,
    pub summary_only: bool,
}

pub async fn run(
    options: &CalcOptions,
    config: &AppConfig,
    provider: &(dyn SeriesProvider + Send + Sync),
    today: NaiveDate,
) -> Result<()> {
    let request = CalculationRequest {
        mode: options.mode.unwrap_or(config.defaults.mode),
        principal: options.principal.unwrap_or(config.defaults.principal),
        start: options.start,
        end: options.end,
        annual_fixed_rate: options.fixed_rate.unwrap_or(config.defaults.fixed_rate),
    };
    info!(
        "Calculating {} from {} to {}",
        request.mode, request.start, request.end
    );

    let spinner = ui::new_spinner("Fetching series...");
    let result = calculate(&request, provider, &config.validation, today).await;
    spinner.finish_and_clear();
    let result = result?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "\nScenario: {}",
        ui::style_text(&result.mode.to_string(), ui::StyleType::Title)
    );
    display_summary(&result);
    if !options.summary_only {
        display_evolution(&result);
    }
    Ok(())
}

/// Compound annual growth of the result over its covered months, in percent.
pub fn annualized_return(result: &CalculationResult) -> Result<f64> {
    let months = result.evolution.len();
    if months == 0 {
        return Err(anyhow!("No months to annualize"));
    }
    let begin_bal = Decimal::from_f64(result.initial_value)
        .ok_or_else(|| anyhow!("Invalid initial value"))?;
    let end_bal =
        Decimal::from_f64(result.final_value).ok_or_else(|| anyhow!("Invalid final value"))?;
    let n_years = Decimal::from(months) / Decimal::from(12);

    let rate = cagr(begin_bal, end_bal, n_years);
    let percentage = (rate * Decimal::from(100))
        .to_f64()
        .ok_or_else(|| anyhow!("CAGR percentage conversion failed"))?;
    debug!("cagr: {begin_bal}, {end_bal}, {n_years} = {rate}, {percentage}");
    Ok(percentage)
}

fn display_summary(result: &CalculationResult) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("Initial value"),
        ui::money_cell(result.initial_value),
    ]);
    let variation_label = match &result.series_label {
        Some(label) => format!("{label} variation"),
        None => "Index variation".to_string(),
    };
    table.add_row(vec![
        Cell::new(variation_label),
        ui::change_cell(result.total_index_variation_pct),
    ]);
    table.add_row(vec![
        Cell::new("Fixed rate (a.a.)"),
        ui::change_cell(result.annual_fixed_rate),
    ]);
    table.add_row(vec![
        Cell::new("Months"),
        Cell::new(result.evolution.len()),
    ]);
    table.add_row(vec![
        Cell::new("Projected months"),
        Cell::new(result.projected_months),
    ]);
    let annualized = annualized_return(result)
        .inspect_err(|e| debug!("Annualized return unavailable: {e}"))
        .ok();
    table.add_row(vec![
        Cell::new("Annualized return"),
        ui::format_optional_cell(annualized, |r| format!("{r:.2}%")),
    ]);
    table.add_row(vec![
        Cell::new("Final value").add_attribute(Attribute::Bold),
        ui::money_cell(result.final_value).add_attribute(Attribute::Bold),
    ]);

    println!("{table}");
}

fn display_evolution(result: &CalculationResult) {
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Month"), ui::header_cell("Rate")];
    if let Some(label) = &result.series_label {
        header.push(ui::header_cell(&format!("{label} only")));
        header.push(ui::header_cell(&format!("{label} + fixed")));
    } else {
        header.push(ui::header_cell("Fixed"));
    }
    header.push(ui::header_cell(""));
    table.set_header(header);

    for point in &result.evolution {
        let mut row = vec![
            Cell::new(point.date.format("%m/%Y")),
            ui::change_cell(point.monthly_rate),
        ];
        if result.series_label.is_some() {
            row.push(ui::money_cell(point.value_index_only));
        }
        row.push(ui::money_cell(point.value_combined));
        row.push(ui::projected_cell(point.is_projected));
        table.add_row(row);
    }

    println!("{table}");
    if result.projected_months > 0 {
        println!(
            "{}",
            ui::style_text(
                "Projected months use the average rate of the last 12 published months.",
                ui::StyleType::Subtle
            )
        );
    }
}
