//! Watch-entry resolution against a country's resort directory

use tracing::debug;

use crate::models::{ResolvedResort, ResortListing};

/// Resolve a requested resort name against a country's listings
///
/// Matching is case-insensitive and runs in two passes: exact name match
/// first, then first listing whose name contains the requested text. The
/// first hit in directory order wins; partial matches never shadow an
/// exact match further down the list.
#[must_use]
pub fn resolve_resort(
    country: &str,
    requested: &str,
    listings: &[ResortListing],
) -> Option<ResolvedResort> {
    let needle = requested.to_lowercase();

    if let Some(listing) = listings
        .iter()
        .find(|listing| listing.name.to_lowercase() == needle)
    {
        debug!("Exact match for '{requested}' in {country}: {}", listing.name);
        return Some(ResolvedResort::from_listing(country, listing));
    }

    if let Some(listing) = listings
        .iter()
        .find(|listing| listing.name.to_lowercase().contains(&needle))
    {
        debug!(
            "Partial match for '{requested}' in {country}: {}",
            listing.name
        );
        return Some(ResolvedResort::from_listing(country, listing));
    }

    None
}
