use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// One entry of the tradable universe a feed quotes against.
#[derive(Clone, Debug, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "basePrice")]
    pub base_price: f64,
    pub sector: String,
}

const BUILTIN_LISTINGS: &str = include_str!("listings.json");

pub fn builtin_listings() -> Vec<Listing> {
    parse_listings(BUILTIN_LISTINGS).expect("embedded listing catalog is valid")
}

/// Loads a user-provided watchlist (same JSON shape as the builtin catalog).
pub fn load_watchlist(path: &Path) -> Result<Vec<Listing>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read watchlist {}", path.display()))?;
    parse_listings(&raw).with_context(|| format!("invalid watchlist {}", path.display()))
}

fn parse_listings(raw: &str) -> Result<Vec<Listing>> {
    let mut listings: Vec<Listing> =
        serde_json::from_str(raw).context("listing catalog is not valid JSON")?;

    listings.retain(|listing| !listing.symbol.is_empty() && listing.base_price.is_finite());

    let mut seen = std::collections::HashSet::new();
    listings.retain(|listing| seen.insert(listing.symbol.clone()));

    if listings.is_empty() {
        Err(anyhow!("listing catalog contains no usable entries"))
    } else {
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses_with_unique_symbols() {
        let listings = builtin_listings();
        assert!(listings.len() >= 50);

        let mut symbols = listings
            .iter()
            .map(|listing| listing.symbol.as_str())
            .collect::<Vec<_>>();
        symbols.sort_unstable();
        let before = symbols.len();
        symbols.dedup();
        assert_eq!(before, symbols.len());
    }

    #[test]
    fn duplicate_symbols_are_dropped() {
        let raw = r#"[
            { "symbol": "AAA", "name": "First", "basePrice": 10.0, "sector": "IT" },
            { "symbol": "AAA", "name": "Dup", "basePrice": 20.0, "sector": "IT" },
            { "symbol": "BBB", "name": "Second", "basePrice": 5.0, "sector": "Banking" }
        ]"#;
        let listings = parse_listings(raw).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "First");
    }
}
