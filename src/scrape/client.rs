//! Blocking HTTP client for the forecast site
//!
//! One client instance drives a whole scrape run: the country catalogue,
//! per-country directories (with their region tabs), and per-resort
//! forecast pages. Requests are strictly sequential.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use scraper::Html;
use tracing::{debug, info};

use super::{directory, forecast_table};
use crate::Result;
use crate::config::ScrapeConfig;
use crate::error::PowderwatchError;
use crate::models::{Country, ForecastPeriod, ResolvedResort, ResortListing};
use crate::orchestrator::ForecastProvider;

/// Client for the forecast site
pub struct SnowForecastClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl SnowForecastClient {
    /// Create a new client from scrape settings
    #[must_use]
    pub fn new(config: &ScrapeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Fetch the country catalogue and extract its country links
    pub fn countries(&self) -> Result<Vec<Country>> {
        let url = format!("{}/countries", self.base_url);
        let document = self.fetch_html(&url)?;
        let countries = directory::countries_in_page(&document);
        info!("Found {} countries in the catalogue", countries.len());
        Ok(countries)
    }

    /// Fetch a country's full resort directory, following region tabs
    ///
    /// Tab pages are concatenated in link order after the first page, with
    /// no de-duplication.
    pub fn resorts_for_country(&self, country: &str) -> Result<Vec<ResortListing>> {
        let url = self.directory_url(country);
        let document = self.fetch_html(&url)?;
        let mut listings = directory::resorts_in_page(&document);

        let tabs = directory::region_tab_links(&document);
        if !tabs.is_empty() {
            debug!("Following {} region tabs for {country}", tabs.len());
        }
        for tab in tabs {
            let tab_url = format!("{}{tab}", self.base_url);
            let tab_document = self.fetch_html(&tab_url)?;
            listings.extend(directory::resorts_in_page(&tab_document));
        }

        info!("Found {} resorts for {country}", listings.len());
        Ok(listings)
    }

    /// Fetch a resort's forecast page and extract its periods
    ///
    /// The forecast endpoint requires a browser-looking user agent. An
    /// empty result means the page carried no usable forecast grid.
    pub fn forecast_for_resort(&self, data_url: &str) -> Result<Vec<ForecastPeriod>> {
        let url = format!("{}{data_url}", self.base_url);
        debug!("Fetching forecast from {url}");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .map_err(|e| PowderwatchError::http(format!("Request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| {
                PowderwatchError::http(format!("Forecast page returned an error status: {e}"))
            })?;
        let body = response
            .text()
            .map_err(|e| PowderwatchError::http(format!("Failed to read body of {url}: {e}")))?;

        let document = Html::parse_document(&body);
        Ok(forecast_table::extract(&document).unwrap_or_default())
    }

    fn directory_url(&self, country: &str) -> String {
        format!(
            "{}/countries/{}/resorts/",
            self.base_url,
            urlencoding::encode(country)
        )
    }

    fn fetch_html(&self, url: &str) -> Result<Html> {
        debug!("Fetching {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PowderwatchError::http(format!("Request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| {
                PowderwatchError::http(format!("Request to {url} returned an error status: {e}"))
            })?;
        let body = response
            .text()
            .map_err(|e| PowderwatchError::http(format!("Failed to read body of {url}: {e}")))?;
        Ok(Html::parse_document(&body))
    }
}

impl ForecastProvider for SnowForecastClient {
    fn resort_directory(&self, country: &str) -> Result<Vec<ResortListing>> {
        self.resorts_for_country(country)
    }

    fn forecast_for(&self, resort: &ResolvedResort) -> Result<Vec<ForecastPeriod>> {
        self.forecast_for_resort(&resort.data_url)
    }
}
