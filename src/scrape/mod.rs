//! Scraping layer for the forecast site
//!
//! This module contains the site-facing pieces organized by concern:
//! - Client: blocking HTTP fetches against the site
//! - Directory: resort listing and country catalogue extraction
//! - Forecast table: the per-resort forecast grid extractor

pub mod client;
pub mod directory;
pub mod forecast_table;

pub use client::SnowForecastClient;
pub use forecast_table::MeasurementRow;

use scraper::Selector;

/// Collapse whitespace runs in scraped text to single spaces
///
/// Text collected from nested markup keeps the page's newlines and
/// indentation otherwise.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}
