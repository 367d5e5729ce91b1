//! On-disk caches for directory listings and watch-entry resolutions
//!
//! Both caches are explicit collaborators handed to the orchestrator:
//! reads and writes go through load/save pairs, and the orchestrator
//! treats any cache error as a miss rather than a failed run.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::error::PowderwatchError;
use crate::models::{ResolvedResort, ResortListing};

/// Directory listings cached per country, one NDJSON file each
pub struct ListingCache {
    dir: PathBuf,
}

impl ListingCache {
    /// Open a listing cache rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Cached listings for a country, if that country was saved before
    pub fn load(&self, country: &str) -> Result<Option<Vec<ResortListing>>> {
        let path = self.file_path(country);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let mut listings = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let listing = serde_json::from_str(&line).map_err(|e| {
                PowderwatchError::cache(format!("Corrupt listing line in {}: {e}", path.display()))
            })?;
            listings.push(listing);
        }

        debug!("Loaded {} cached listings for {country}", listings.len());
        Ok(Some(listings))
    }

    /// Replace the cached listings for a country
    pub fn save(&self, country: &str, listings: &[ResortListing]) -> Result<()> {
        let path = self.file_path(country);
        let mut file = File::create(&path)?;
        for listing in listings {
            let line = serde_json::to_string(listing)
                .map_err(|e| PowderwatchError::cache(format!("Failed to encode listing: {e}")))?;
            writeln!(file, "{line}")?;
        }
        debug!("Cached {} listings for {country}", listings.len());
        Ok(())
    }

    fn file_path(&self, country: &str) -> PathBuf {
        self.dir.join(format!("resorts-{}.ndjson", file_slug(country)))
    }
}

/// Watch-entry resolutions cached in a single JSON map
///
/// Keys combine the country and the lowercased requested name, so a hit
/// short-circuits matching but never crosses countries.
pub struct ResolvedCache {
    path: PathBuf,
}

impl ResolvedCache {
    /// Open a resolution cache stored inside the given directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            path: dir.as_ref().join("resolved-resorts.json"),
        })
    }

    /// Cached resolution for a watch entry, if one was saved before
    pub fn load(&self, country: &str, requested: &str) -> Result<Option<ResolvedResort>> {
        let map = self.read_map()?;
        Ok(map.get(&entry_key(country, requested)).cloned())
    }

    /// Record the resolution for a watch entry
    pub fn save(&self, country: &str, requested: &str, resort: &ResolvedResort) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(entry_key(country, requested), resort.clone());
        let body = serde_json::to_string_pretty(&map).map_err(|e| {
            PowderwatchError::cache(format!("Failed to encode resolution cache: {e}"))
        })?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn read_map(&self) -> Result<BTreeMap<String, ResolvedResort>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| {
            PowderwatchError::cache(format!(
                "Corrupt resolution cache {}: {e}",
                self.path.display()
            ))
        })
    }
}

fn entry_key(country: &str, requested: &str) -> String {
    format!("{country}/{}", requested.to_lowercase())
}

/// Country names become file names; keep only filesystem-safe characters
fn file_slug(country: &str) -> String {
    country
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
