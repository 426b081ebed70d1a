use super::calc::annualized_return;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::{
    CalculationRequest, CalculationResult, ScenarioMode, SeriesProvider, calculate,
};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, Color};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub principal: Option<f64>,
    pub fixed_rate: Option<f64>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub json: bool,
}

/// One scenario of a comparison; failed scenarios keep their error message.
#[derive(Debug, Serialize)]
struct ScenarioOutcome {
    mode: ScenarioMode,
    result: Option<CalculationResult>,
    error: Option<String>,
}

pub async fn run(
    options: &CompareOptions,
    config: &AppConfig,
    provider: &(dyn SeriesProvider + Send + Sync),
    today: NaiveDate,
) -> Result<()> {
    let requests: Vec<CalculationRequest> = ScenarioMode::ALL
        .iter()
        .map(|mode| CalculationRequest {
            mode: *mode,
            principal: options.principal.unwrap_or(config.defaults.principal),
            start: options.start,
            end: options.end,
            annual_fixed_rate: options.fixed_rate.unwrap_or(config.defaults.fixed_rate),
        })
        .collect();

    // Every scenario shares the same inputs
    if let Some(first) = requests.first() {
        first.validate(&config.validation, today)?;
    }
    info!(
        "Comparing {} scenarios from {} to {}",
        requests.len(),
        options.start,
        options.end
    );

    // In order, so the fixed-only scenario is served from the cached IPCA response
    let pb = ui::new_progress_bar(requests.len() as u64);
    let mut outcomes = Vec::with_capacity(requests.len());
    for request in &requests {
        pb.set_message(request.mode.to_string());
        let outcome = match calculate(request, provider, &config.validation, today).await {
            Ok(result) => ScenarioOutcome {
                mode: request.mode,
                result: Some(result),
                error: None,
            },
            Err(e) => {
                debug!("Scenario {} failed: {}", request.mode, e);
                ScenarioOutcome {
                    mode: request.mode,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        };
        outcomes.push(outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
        return Ok(());
    }

    display_comparison(&outcomes, requests.first());
    Ok(())
}

fn outcome_row(outcome: &ScenarioOutcome, best: f64) -> Vec<Cell> {
    let mut row = vec![Cell::new(outcome.mode.to_string())];
    match &outcome.result {
        Some(result) => {
            let annualized = annualized_return(result).ok();
            row.push(ui::change_cell(result.total_index_variation_pct));
            row.push(ui::format_optional_cell(annualized, |r| format!("{r:.2}%")));
            let final_value = ui::money_cell(result.final_value);
            row.push(if result.final_value == best {
                final_value.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                final_value
            });
            row.push(Cell::new(result.projected_months));
        }
        None => {
            let has_error = outcome.error.is_some();
            row.extend((0..4).map(|_| ui::na_cell(has_error)));
        }
    }
    row
}

fn display_comparison(outcomes: &[ScenarioOutcome], request: Option<&CalculationRequest>) {
    if let Some(request) = request {
        println!(
            "\n{} {:.2} from {} to {}",
            ui::style_text("Comparison:", ui::StyleType::Title),
            request.principal,
            request.start.format("%m/%Y"),
            request.end.format("%m/%Y"),
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Scenario"),
        ui::header_cell("Index variation"),
        ui::header_cell("Annualized"),
        ui::header_cell("Final value"),
        ui::header_cell("Projected months"),
    ]);

    let best = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().map(|r| r.final_value))
        .fold(f64::NEG_INFINITY, f64::max);

    for outcome in outcomes {
        table.add_row(outcome_row(outcome, best));
    }

    println!("{table}");

    for outcome in outcomes {
        if let Some(error) = &outcome.error {
            println!(
                "{} {}",
                ui::style_text(&format!("{}:", outcome.mode), ui::StyleType::TotalLabel),
                error
            );
        }
    }
}
