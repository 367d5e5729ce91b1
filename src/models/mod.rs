//! Data models for the powderwatch application
//!
//! This module contains the core domain models organized by concern:
//! - Resort: directory listings, countries, and resolved watch entries
//! - Forecast: extracted forecast periods and snow amount helpers

pub mod forecast;
pub mod resort;

// Re-export the model types so callers can skip the submodule paths
pub use forecast::{ForecastPeriod, ResortForecast, parse_snow_amount};
pub use resort::{Country, GeoPoint, ResolvedResort, ResortListing};
