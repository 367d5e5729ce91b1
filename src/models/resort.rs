//! Resort directory models: listings, countries, and resolved watch entries

use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographic point
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One country link from the site's country catalogue page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Country {
    /// Display name as shown in the catalogue
    pub name: String,
    /// Site-relative link to the country's resort directory
    pub url: String,
}

/// One resort row from a country's directory page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResortListing {
    /// Display name as shown in the directory
    pub name: String,
    /// Site-relative link to the resort's landing page
    pub canonical_url: String,
    /// Site-relative link the forecast grid is fetched from
    pub data_url: String,
    /// Resort coordinates, when the row carries them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
}

/// A watch-list entry resolved to a concrete directory listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedResort {
    /// Directory display name, not the watch-list spelling
    pub name: String,
    /// Country the listing was found under
    pub country: String,
    /// Site-relative link to the resort's landing page
    pub canonical_url: String,
    /// Site-relative link the forecast grid is fetched from
    pub data_url: String,
    /// Resort coordinates, when the directory row carried them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
}

impl ResolvedResort {
    /// Pin a directory listing to the country it was fetched for
    #[must_use]
    pub fn from_listing(country: &str, listing: &ResortListing) -> Self {
        Self {
            name: listing.name.clone(),
            country: country.to_string(),
            canonical_url: listing.canonical_url.clone(),
            data_url: listing.data_url.clone(),
            geo: listing.geo,
        }
    }
}
