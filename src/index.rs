//! Search-index documents and the bulk upload sink
//!
//! Assembled forecasts can be pushed to an Elasticsearch-compatible
//! cluster after a run. Indexing is strictly downstream of scraping: the
//! forecast output never depends on the sink succeeding.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Result;
use crate::config::IndexConfig;
use crate::error::PowderwatchError;
use crate::models::{ForecastPeriod, GeoPoint, ResortForecast};

/// One searchable forecast document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDocument {
    /// Directory display name of the resort
    pub resort: String,
    /// Country the resort was resolved under
    pub country: String,
    /// Resort coordinates as a geo point, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Forecast periods in grid column order
    pub forecast: Vec<ForecastPeriod>,
    /// Sum of the numeric snow cells, in centimetres
    pub total_snow_cm: f64,
    /// When the forecast was scraped
    pub retrieved_at: DateTime<Utc>,
}

impl From<&ResortForecast> for ForecastDocument {
    fn from(forecast: &ResortForecast) -> Self {
        Self {
            resort: forecast.resort.clone(),
            country: forecast.country.clone(),
            location: forecast.geo,
            forecast: forecast.periods.clone(),
            total_snow_cm: forecast.total_snow_cm(),
            retrieved_at: forecast.retrieved_at,
        }
    }
}

/// Destination for assembled forecast documents
pub trait ForecastSink {
    /// Upload the documents, returning how many were accepted
    fn index(&self, documents: &[ForecastDocument]) -> Result<usize>;
}

/// Bulk uploader for an Elasticsearch-compatible cluster
pub struct ElasticIndexer {
    client: Client,
    base_url: String,
    index: String,
}

/// The part of the bulk API response the uploader cares about
#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
}

impl ElasticIndexer {
    /// Create an uploader from index settings
    #[must_use]
    pub fn new(config: &IndexConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.name.clone(),
        }
    }

    /// Newline-delimited bulk payload: an action line then a document
    /// line per document, with a terminating newline
    fn bulk_body(&self, documents: &[ForecastDocument]) -> Result<String> {
        let mut body = String::new();
        for document in documents {
            let action = serde_json::json!({ "index": { "_index": self.index } });
            body.push_str(&action.to_string());
            body.push('\n');
            let line = serde_json::to_string(document).map_err(|e| {
                PowderwatchError::parse(format!("Failed to encode forecast document: {e}"))
            })?;
            body.push_str(&line);
            body.push('\n');
        }
        Ok(body)
    }
}

impl ForecastSink for ElasticIndexer {
    fn index(&self, documents: &[ForecastDocument]) -> Result<usize> {
        if documents.is_empty() {
            debug!("No forecast documents to index");
            return Ok(0);
        }

        let url = format!("{}/_bulk", self.base_url);
        let body = self.bulk_body(documents)?;
        debug!("Posting {} documents to {url}", documents.len());

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .map_err(|e| PowderwatchError::http(format!("Bulk request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| {
                PowderwatchError::http(format!("Bulk request returned an error status: {e}"))
            })?;

        let summary: BulkResponse = response.json().map_err(|e| {
            PowderwatchError::parse(format!("Unreadable bulk response from {url}: {e}"))
        })?;
        if summary.errors {
            return Err(PowderwatchError::http(format!(
                "Bulk indexing into '{}' reported item errors",
                self.index
            )));
        }

        info!(
            "Indexed {} forecast documents into '{}'",
            documents.len(),
            self.index
        );
        Ok(documents.len())
    }
}
