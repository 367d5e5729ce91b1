use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use powderwatch::cache::{ListingCache, ResolvedCache};
use powderwatch::config::{PowderwatchConfig, WatchList};
use powderwatch::index::{ElasticIndexer, ForecastDocument, ForecastSink};
use powderwatch::models::ResortForecast;
use powderwatch::orchestrator::ForecastService;
use powderwatch::scrape::SnowForecastClient;

fn main() -> Result<()> {
    let config = PowderwatchConfig::load().context("Failed to load configuration")?;
    init_logging(&config);

    info!("==== Starting new run ====");

    let watchlist_path = std::path::PathBuf::from(&config.watchlist.file);
    let watchlist =
        WatchList::load_from_path(&watchlist_path).context("Failed to load the watch-list")?;
    info!(
        "Watching {} resorts across {} countries",
        watchlist.resort_count(),
        watchlist.country_count()
    );

    let client = SnowForecastClient::new(&config.scrape);

    let caches = if config.cache.enabled {
        Some((
            ListingCache::new(&config.cache.location)
                .context("Failed to open the listing cache")?,
            ResolvedCache::new(&config.cache.location)
                .context("Failed to open the resolution cache")?,
        ))
    } else {
        None
    };

    let mut service = ForecastService::new(&client);
    if let Some((listings, resolutions)) = &caches {
        service = service.with_caches(listings, resolutions);
    }

    let forecasts = service
        .run_forecasts(&watchlist)
        .context("Scrape run failed")?;

    if forecasts.is_empty() {
        println!("No forecasts available for the watched resorts.");
        return Ok(());
    }
    print_report(&forecasts);

    if config.index.enabled {
        upload(&config, &forecasts);
    }

    Ok(())
}

fn init_logging(config: &PowderwatchConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("powderwatch={}", config.logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "compact" {
        registry.with(fmt::layer().compact()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

fn print_report(forecasts: &[ResortForecast]) {
    for forecast in forecasts {
        println!("\nForecast for {} ({})", forecast.resort, forecast.country);
        for period in &forecast.periods {
            let date = period
                .date
                .map_or_else(|| "          ".to_string(), |d| d.to_string());
            println!(
                "  {date} {:<6} snow: {:<6} freezing: {:<6} humidity: {:<4} wind: {}",
                period.time_of_day,
                cell(&period.snow),
                cell(&period.freezing_level),
                cell(&period.humidity),
                cell(&period.wind),
            );
        }
        println!("  Total fresh snow: {:.1} cm", forecast.total_snow_cm());
    }
}

fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Push the run's forecasts to the search cluster. Upload problems are
/// logged and swallowed; the printed report already happened.
fn upload(config: &PowderwatchConfig, forecasts: &[ResortForecast]) {
    let indexer = ElasticIndexer::new(&config.index);
    let documents: Vec<ForecastDocument> = forecasts.iter().map(ForecastDocument::from).collect();
    match indexer.index(&documents) {
        Ok(count) => info!("Uploaded {count} forecast documents"),
        Err(e) => warn!("Forecast upload failed: {e}"),
    }
}
