//! Watch-list orchestration
//!
//! Drives a full scrape run: one directory fetch per watched country,
//! name resolution for each watch entry, then one forecast fetch per
//! resolved resort. Transport failures abort the run; a watch entry that
//! cannot be matched or has no forecast data is reported and skipped.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::Result;
use crate::cache::{ListingCache, ResolvedCache};
use crate::config::WatchList;
use crate::matcher;
use crate::models::{ForecastPeriod, ResolvedResort, ResortForecast, ResortListing};

/// Source of directory listings and per-resort forecasts
///
/// `SnowForecastClient` is the production implementation; tests drive the
/// service with fixture-backed providers instead.
pub trait ForecastProvider {
    /// Full resort directory for a country
    fn resort_directory(&self, country: &str) -> Result<Vec<ResortListing>>;

    /// Forecast periods for a resolved resort; empty when the page held
    /// no usable forecast grid
    fn forecast_for(&self, resort: &ResolvedResort) -> Result<Vec<ForecastPeriod>>;
}

/// Orchestrates directory fetches, matching, and forecast extraction
pub struct ForecastService<'a, P> {
    provider: &'a P,
    listings: Option<&'a ListingCache>,
    resolutions: Option<&'a ResolvedCache>,
}

impl<'a, P: ForecastProvider> ForecastService<'a, P> {
    /// Create a service without caches
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            listings: None,
            resolutions: None,
        }
    }

    /// Attach directory and resolution caches
    #[must_use]
    pub fn with_caches(
        mut self,
        listings: &'a ListingCache,
        resolutions: &'a ResolvedCache,
    ) -> Self {
        self.listings = Some(listings);
        self.resolutions = Some(resolutions);
        self
    }

    /// Scraped forecasts keyed by directory resort name
    ///
    /// Countries are visited in watch-list order. Watch entries without a
    /// match and resorts without forecast data are absent from the result.
    pub fn run(&self, watchlist: &WatchList) -> Result<BTreeMap<String, Vec<ForecastPeriod>>> {
        Ok(self
            .run_forecasts(watchlist)?
            .into_iter()
            .map(|forecast| (forecast.resort, forecast.periods))
            .collect())
    }

    /// Scraped forecasts with resort identity and retrieval metadata
    ///
    /// Same traversal as [`Self::run`], keeping country, coordinates, and
    /// the retrieval timestamp for indexing.
    pub fn run_forecasts(&self, watchlist: &WatchList) -> Result<Vec<ResortForecast>> {
        let mut by_resort: BTreeMap<String, ResortForecast> = BTreeMap::new();

        for (country, requested_names) in watchlist.countries() {
            let listings = self.directory_for(country)?;

            for requested in requested_names {
                let Some(resort) = self.resolve(country, requested, &listings) else {
                    warn!("No matching resort found for '{requested}' in {country}");
                    continue;
                };
                info!(
                    "Matched '{requested}' to {} ({})",
                    resort.name, resort.canonical_url
                );

                let periods = self.provider.forecast_for(&resort)?;
                if periods.is_empty() {
                    info!("No forecast data for {}, skipping", resort.name);
                    continue;
                }
                debug!(
                    "Extracted {} forecast periods for {}",
                    periods.len(),
                    resort.name
                );
                by_resort.insert(resort.name.clone(), ResortForecast::new(&resort, periods));
            }
        }

        Ok(by_resort.into_values().collect())
    }

    fn directory_for(&self, country: &str) -> Result<Vec<ResortListing>> {
        if let Some(cache) = self.listings {
            match cache.load(country) {
                Ok(Some(listings)) => {
                    info!("Using {} cached listings for {country}", listings.len());
                    return Ok(listings);
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable listing cache for {country}: {e}"),
            }
        }

        let listings = self.provider.resort_directory(country)?;

        if let Some(cache) = self.listings {
            if let Err(e) = cache.save(country, &listings) {
                warn!("Failed to cache listings for {country}: {e}");
            }
        }
        Ok(listings)
    }

    fn resolve(
        &self,
        country: &str,
        requested: &str,
        listings: &[ResortListing],
    ) -> Option<ResolvedResort> {
        if let Some(cache) = self.resolutions {
            match cache.load(country, requested) {
                Ok(Some(resort)) => {
                    debug!("Using cached resolution for '{requested}' in {country}");
                    return Some(resort);
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable resolution cache: {e}"),
            }
        }

        let resort = matcher::resolve_resort(country, requested, listings)?;

        if let Some(cache) = self.resolutions {
            if let Err(e) = cache.save(country, requested, &resort) {
                warn!("Failed to cache resolution for '{requested}': {e}");
            }
        }
        Some(resort)
    }
}
