//! Resort directory and country catalogue extraction
//!
//! Pure routines over parsed directory pages. Fetching and tab pagination
//! live in the client; everything here works on one page at a time.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{clean_text, selector};
use crate::models::{Country, GeoPoint, ResortListing};

static DIGEST_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr.digest-row"));
static NAME_CELL: LazyLock<Selector> = LazyLock::new(|| selector("div.name"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static REGION_TAB_LINK: LazyLock<Selector> = LazyLock::new(|| selector("div#ctry_tabs a"));
static EUROPE_ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a#europe"));
static COUNTRY_LIST: LazyLock<Selector> = LazyLock::new(|| selector("ul.countries-list"));
static LIST_LINK: LazyLock<Selector> = LazyLock::new(|| selector("li a"));

/// Extract resort rows from one directory page
///
/// A row contributes a listing only if it carries the forecast feed URL
/// attribute, a name element, and a landing page link inside the name.
/// Rows missing any of those are skipped silently.
#[must_use]
pub fn resorts_in_page(document: &Html) -> Vec<ResortListing> {
    let mut listings = Vec::new();
    for row in document.select(&DIGEST_ROW) {
        let Some(data_url) = row.value().attr("data-url") else {
            continue;
        };
        let Some(name_cell) = row.select(&NAME_CELL).next() else {
            continue;
        };
        let Some(canonical_url) = name_cell
            .select(&ANCHOR)
            .next()
            .and_then(|link| link.value().attr("href"))
        else {
            continue;
        };

        listings.push(ResortListing {
            name: clean_text(&name_cell.text().collect::<String>()),
            canonical_url: canonical_url.to_string(),
            data_url: data_url.to_string(),
            geo: row_geo(row),
        });
    }
    listings
}

/// Coordinates from the row attributes, when both are present and numeric
fn row_geo(row: ElementRef<'_>) -> Option<GeoPoint> {
    let lat = row.value().attr("data-lat")?.trim().parse().ok()?;
    let lon = row.value().attr("data-lng")?.trim().parse().ok()?;
    Some(GeoPoint::new(lat, lon))
}

/// Region tab links on a directory page, in document order
///
/// Large countries split their directory across region tabs; the first
/// page is served directly and the rest are linked from the tab strip.
#[must_use]
pub fn region_tab_links(document: &Html) -> Vec<String> {
    document
        .select(&REGION_TAB_LINK)
        .filter_map(|link| link.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Extract countries from the catalogue page
///
/// The catalogue is anchored on the Europe heading; the countries list
/// that follows it in document order carries one link per country.
#[must_use]
pub fn countries_in_page(document: &Html) -> Vec<Country> {
    let Some(anchor) = document.select(&EUROPE_ANCHOR).next() else {
        warn!("Country catalogue page has no Europe anchor");
        return Vec::new();
    };
    let Some(list) = following_countries_list(anchor) else {
        warn!("No countries list follows the Europe anchor");
        return Vec::new();
    };

    list.select(&LIST_LINK)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            Some(Country {
                name: clean_text(&link.text().collect::<String>()),
                url: href.to_string(),
            })
        })
        .collect()
}

/// First countries list after the anchor in document order
///
/// Checks the anchor's following siblings, then the following siblings of
/// each ancestor, descending into containers along the way.
fn following_countries_list(anchor: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut scope = Some(*anchor);
    while let Some(node) = scope {
        for sibling in node.next_siblings() {
            let Some(element) = ElementRef::wrap(sibling) else {
                continue;
            };
            if is_countries_list(element) {
                return Some(element);
            }
            if let Some(nested) = element.select(&COUNTRY_LIST).next() {
                return Some(nested);
            }
        }
        scope = node.parent();
    }
    None
}

fn is_countries_list(element: ElementRef<'_>) -> bool {
    element.value().name() == "ul"
        && element
            .value()
            .classes()
            .any(|class| class == "countries-list")
}
