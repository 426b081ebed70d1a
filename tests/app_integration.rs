use chrono::NaiveDate;
use indexa::AppCommand;
use indexa::cli::{calc::CalcOptions, compare::CompareOptions, series::SeriesOptions};
use indexa::core::config::AppConfig;
use indexa::core::{CalcError, CalculationRequest, ScenarioMode, SeriesRecord, calculate};
use indexa::providers::bcb_provider::BcbProvider;
use indexa::store::memory::MemoryCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const IPCA_PATH: &str = "/dados/serie/bcdata.sgs.433/dados";
    pub const SELIC_PATH: &str = "/dados/serie/bcdata.sgs.4390/dados";

    pub const IPCA_JSON: &str = r#"[
        {"data": "01/01/2024", "valor": "0.42"},
        {"data": "01/02/2024", "valor": "0.83"},
        {"data": "01/03/2024", "valor": "0.16"}
    ]"#;

    pub const SELIC_JSON: &str = r#"[
        {"data": "01/01/2024", "valor": "0.97"},
        {"data": "01/02/2024", "valor": "0.80"},
        {"data": "01/03/2024", "valor": "0.83"}
    ]"#;

    pub async fn mount_series(
        mock_server: &MockServer,
        series_path: &str,
        mock_response: &str,
        expected_calls: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(series_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(expected_calls)
            .mount(mock_server)
            .await;
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        providers:
          bcb:
            base_url: {base_url}
        defaults:
          mode: ipca
          principal: 1000.0
          fixed_rate: 6.0
    "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bcb_provider(base_url: &str) -> BcbProvider {
    BcbProvider::new(
        base_url,
        Arc::new(MemoryCache::<String, Vec<SeriesRecord>>::new()),
        Duration::from_secs(60),
    )
}

fn calc_options(mode: ScenarioMode) -> CalcOptions {
    CalcOptions {
        mode: Some(mode),
        principal: None,
        fixed_rate: None,
        start: date(2024, 1, 1),
        end: date(2024, 3, 1),
        json: false,
        summary_only: false,
    }
}

#[test_log::test(tokio::test)]
async fn test_full_calc_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, test_utils::IPCA_PATH, test_utils::IPCA_JSON, 1)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = indexa::run_command(
        AppCommand::Calc(calc_options(ScenarioMode::IndexPlusFixed)),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Calc command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_calc_json_with_projection() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, test_utils::SELIC_PATH, test_utils::SELIC_JSON, 1)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let mut options = calc_options(ScenarioMode::SelicPlusFixed);
    options.end = date(2024, 8, 1);
    options.json = true;

    let result = indexa::run_command(
        AppCommand::Calc(options),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Calc command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_selic_projection_values_through_provider() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, test_utils::SELIC_PATH, test_utils::SELIC_JSON, 1)
        .await;
    let provider = bcb_provider(&mock_server.uri());

    let request = CalculationRequest {
        mode: ScenarioMode::SelicPlusFixed,
        principal: 1000.0,
        start: date(2024, 1, 1),
        end: date(2024, 8, 1),
        annual_fixed_rate: 6.0,
    };
    let config = AppConfig::default();
    let result = calculate(&request, &provider, &config.validation, date(2024, 9, 1))
        .await
        .unwrap();

    assert_eq!(result.evolution.len(), 8);
    assert_eq!(result.projected_months, 5);
    assert!(!result.evolution[2].is_projected);
    assert!(result.evolution[3..].iter().all(|p| p.is_projected));
    assert_eq!(result.evolution[7].date, date(2024, 8, 1));

    let average = (0.97 + 0.80 + 0.83) / 3.0;
    assert!((result.evolution[7].monthly_rate - average).abs() < 1e-12);

    let expected = 1000.0 * (1.0097 * 1.005) * (1.0080 * 1.005) * (1.0083 * 1.005)
        * ((1.0 + average / 100.0) * 1.005).powi(5);
    assert!((result.final_value - expected).abs() < 1e-9);

    let annualized = indexa::cli::calc::annualized_return(&result).unwrap();
    let expected_cagr = ((expected / 1000.0).powf(12.0 / 8.0) - 1.0) * 100.0;
    assert!((annualized - expected_cagr).abs() < 0.01);
}

#[test_log::test(tokio::test)]
async fn test_compare_reuses_ipca_response() {
    let mock_server = wiremock::MockServer::start().await;
    // IPCA + fixed and fixed-only both need IPCA; the second is a cache hit
    test_utils::mount_series(&mock_server, test_utils::IPCA_PATH, test_utils::IPCA_JSON, 1)
        .await;
    test_utils::mount_series(&mock_server, test_utils::SELIC_PATH, test_utils::SELIC_JSON, 1)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let options = CompareOptions {
        principal: Some(2500.0),
        fixed_rate: Some(4.5),
        start: date(2024, 1, 1),
        end: date(2024, 3, 1),
        json: false,
    };
    let result = indexa::run_command(
        AppCommand::Compare(options),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Compare command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_series_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, test_utils::IPCA_PATH, test_utils::IPCA_JSON, 1)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let options = SeriesOptions {
        series: indexa::core::SeriesId::Ipca,
        start: date(2024, 1, 1),
        end: date(2024, 6, 1),
        json: false,
    };
    let result = indexa::run_command(
        AppCommand::Series(options),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Series command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_empty_series_is_data_unavailable() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, test_utils::IPCA_PATH, "[]", 1).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let err = indexa::run_command(
        AppCommand::Calc(calc_options(ScenarioMode::IndexPlusFixed)),
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CalcError>(),
        Some(CalcError::DataUnavailable { .. })
    ));
}

#[test_log::test(tokio::test)]
async fn test_invalid_range_never_fetches() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_series(&mock_server, test_utils::IPCA_PATH, test_utils::IPCA_JSON, 0)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let mut options = calc_options(ScenarioMode::IndexPlusFixed);
    options.start = date(2024, 5, 1);

    let err = indexa::run_command(
        AppCommand::Calc(options),
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CalcError>(),
        Some(CalcError::InvalidInput(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.yaml");
    assert!(!missing.exists());

    let result = indexa::run_command(
        AppCommand::Calc(calc_options(ScenarioMode::FixedOnly)),
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .starts_with("Failed to read config file")
    );
}

#[test_log::test(tokio::test)]
#[ignore = "requires network access to api.bcb.gov.br"]
async fn test_real_bcb_api() {
    use indexa::core::{SeriesId, SeriesProvider};

    let provider = bcb_provider("https://api.bcb.gov.br");

    info!("Fetching IPCA for 2023 from the BCB API");
    let result = provider
        .fetch_series(SeriesId::Ipca, date(2023, 1, 1), date(2023, 12, 31))
        .await;

    match result {
        Ok(records) => {
            info!(?records, "Received series response");
            assert_eq!(records.len(), 12, "IPCA 2023 should have 12 months");
            assert_eq!(records[0].date, "01/01/2023");
        }
        Err(e) => {
            error!("BCB API request failed: {e}\n{e:?}");
            panic!("BCB API request failed: {e}");
        }
    }
}
