use super::ui;
use crate::core::config::AppConfig;
use crate::core::calculator::validate_range;
use crate::core::engine::cumulative_variation;
use crate::core::resolver::resolve_observations;
use crate::core::{MonthlyObservation, SeriesId, SeriesProvider};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SeriesOptions {
    pub series: SeriesId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub json: bool,
}

pub async fn run(
    options: &SeriesOptions,
    config: &AppConfig,
    provider: &(dyn SeriesProvider + Send + Sync),
    today: NaiveDate,
) -> Result<()> {
    validate_range(options.start, options.end, &config.validation, today)?;
    info!(
        "Resolving {} from {} to {}",
        options.series, options.start, options.end
    );

    let spinner = ui::new_spinner("Fetching series...");
    let observations =
        resolve_observations(provider, options.series, options.start, options.end).await;
    spinner.finish_and_clear();
    let observations = observations?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&observations)?);
        return Ok(());
    }

    println!(
        "\nSeries: {}",
        ui::style_text(&options.series.to_string(), ui::StyleType::Title)
    );
    display_observations(&observations);
    Ok(())
}

fn display_observations(observations: &[MonthlyObservation]) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Rate"),
        ui::header_cell("Accumulated"),
        ui::header_cell(""),
    ]);

    for (i, obs) in observations.iter().enumerate() {
        table.add_row(vec![
            Cell::new(obs.date.format("%m/%Y")),
            ui::change_cell(obs.monthly_rate),
            ui::change_cell(cumulative_variation(&observations[..=i])),
            ui::projected_cell(obs.is_projected),
        ]);
    }

    println!("{table}");
}
