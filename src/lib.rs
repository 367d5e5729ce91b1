//! `powderwatch` - Watch-list driven snow forecast scraping
//!
//! This library provides the core functionality for scraping ski-resort
//! snow forecasts: directory and forecast-grid extraction, watch-list
//! resolution, and assembly of per-resort forecasts.

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod models;
pub mod orchestrator;
pub mod scrape;

// Re-export core types for public API
pub use cache::{ListingCache, ResolvedCache};
pub use config::{PowderwatchConfig, WatchList};
pub use error::PowderwatchError;
pub use index::{ElasticIndexer, ForecastDocument, ForecastSink};
pub use models::{Country, ForecastPeriod, GeoPoint, ResolvedResort, ResortForecast, ResortListing};
pub use orchestrator::{ForecastProvider, ForecastService};
pub use scrape::SnowForecastClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PowderwatchError>;
