use crate::core::cache::Cache;
use crate::core::series::{SeriesId, SeriesProvider, SeriesRecord};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

const SGS_DATE_FORMAT: &str = "%d/%m/%Y";

/// Client for the Banco Central do Brasil time series API (SGS).
pub struct BcbProvider {
    base_url: String,
    cache: Arc<dyn Cache<String, Vec<SeriesRecord>>>,
    cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
struct SgsRecord {
    data: String,
    valor: String,
}

impl BcbProvider {
    pub fn new(
        base_url: &str,
        cache: Arc<dyn Cache<String, Vec<SeriesRecord>>>,
        cache_ttl: Duration,
    ) -> Self {
        BcbProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl,
        }
    }

    fn series_url(&self, series: SeriesId, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/dados/serie/bcdata.sgs.{}/dados?formato=json&dataInicial={}&dataFinal={}",
            self.base_url,
            series.code(),
            start.format(SGS_DATE_FORMAT),
            end.format(SGS_DATE_FORMAT)
        )
    }
}

#[async_trait]
impl SeriesProvider for BcbProvider {
    #[instrument(
        name = "BcbSeriesFetch",
        skip(self),
        fields(series = %series, start = %start, end = %end)
    )]
    async fn fetch_series(
        &self,
        series: SeriesId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeriesRecord>> {
        let url = self.series_url(series, start, end);
        if let Some(cached) = self.cache.get(&url).await {
            return Ok(cached);
        }

        debug!("Requesting series data from {}", url);
        let client = reqwest::Client::builder().user_agent("indexa/0.1").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request for series {series}"))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for series {series}"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Request for series {} failed with status {}: '{}'",
                series,
                status,
                response_text.trim()
            ));
        }

        if response_text.trim().is_empty() {
            return Err(anyhow!("Received empty response for series {}", series));
        }

        let sgs_records: Vec<SgsRecord> = match serde_json::from_str(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse series response"
                );
                return Err(e).with_context(|| {
                    format!("Failed to parse response for series {series}. Response: '{response_text}'")
                });
            }
        };

        let records: Vec<SeriesRecord> = sgs_records
            .into_iter()
            .map(|r| SeriesRecord {
                date: r.data,
                value: r.valor,
            })
            .collect();
        debug!("Fetched {} record(s) for {}", records.len(), series);

        self.cache
            .put(url, records.clone(), Some(self.cache_ttl))
            .await;
        Ok(records)
    }
}
