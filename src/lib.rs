pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::SeriesRecord;
use crate::core::config::AppConfig;
use crate::providers::bcb_provider::BcbProvider;
use crate::store::memory::MemoryCache;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Calc(cli::calc::CalcOptions),
    Compare(cli::compare::CompareOptions),
    Series(cli::series::SeriesOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("indexa starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let series_cache = Arc::new(MemoryCache::<String, Vec<SeriesRecord>>::new());
    let provider = BcbProvider::new(
        &config.providers.bcb.base_url,
        series_cache,
        Duration::from_secs(config.providers.bcb.cache_ttl_secs),
    );
    let today = chrono::Local::now().date_naive();

    match command {
        AppCommand::Calc(options) => cli::calc::run(&options, &config, &provider, today).await,
        AppCommand::Compare(options) => {
            cli::compare::run(&options, &config, &provider, today).await
        }
        AppCommand::Series(options) => cli::series::run(&options, &config, &provider, today).await,
    }
}
