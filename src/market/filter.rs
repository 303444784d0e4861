use std::collections::BTreeMap;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::model::{SectorPerformance, SortDirection, SortKey, Stock};

pub const ALL_SECTORS: &str = "All";

/// Keeps stocks whose symbol or name fuzzy-matches the query. An empty query
/// passes everything through.
pub fn filter_by_search(stocks: &[Stock], query: &str) -> Vec<Stock> {
    let query = query.trim();
    if query.is_empty() {
        return stocks.to_vec();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    stocks
        .iter()
        .filter(|stock| {
            matcher.fuzzy_match(&stock.symbol, query).is_some()
                || matcher.fuzzy_match(&stock.name, query).is_some()
        })
        .cloned()
        .collect()
}

pub fn filter_by_sector(stocks: &[Stock], sector: &str) -> Vec<Stock> {
    if sector.is_empty() || sector == ALL_SECTORS {
        return stocks.to_vec();
    }

    stocks
        .iter()
        .filter(|stock| stock.sector == sector)
        .cloned()
        .collect()
}

pub fn sort_stocks(stocks: &mut [Stock], key: SortKey, direction: SortDirection) {
    stocks.sort_by(|a, b| {
        let ordering = match key {
            SortKey::MarketCap => a.market_cap.total_cmp(&b.market_cap),
            SortKey::Price => a.price.total_cmp(&b.price),
            SortKey::ChangePercent => a.change_percent.total_cmp(&b.change_percent),
            SortKey::Name => a.name.cmp(&b.name),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Distinct sectors present in the snapshot, with the synthetic "All" entry
/// first.
pub fn sectors_of(stocks: &[Stock]) -> Vec<String> {
    let mut sectors = stocks
        .iter()
        .map(|stock| stock.sector.clone())
        .collect::<Vec<_>>();
    sectors.sort();
    sectors.dedup();
    sectors.insert(0, ALL_SECTORS.to_owned());
    sectors
}

pub fn sector_performance(stocks: &[Stock]) -> Vec<SectorPerformance> {
    let mut by_sector: BTreeMap<&str, (f32, f64, usize)> = BTreeMap::new();
    for stock in stocks {
        let entry = by_sector.entry(&stock.sector).or_default();
        entry.0 += stock.change_percent;
        entry.1 += stock.market_cap;
        entry.2 += 1;
    }

    let mut rollup = by_sector
        .into_iter()
        .map(
            |(name, (total_change, total_market_cap, count))| SectorPerformance {
                name: name.to_owned(),
                average_change_percent: total_change / count as f32,
                total_market_cap,
                stock_count: count,
            },
        )
        .collect::<Vec<_>>();

    rollup.sort_by(|a, b| b.total_market_cap.total_cmp(&a.total_market_cap));
    rollup
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(symbol: &str, name: &str, sector: &str, price: f64, change: f32, cap: f64) -> Stock {
        Stock {
            id: symbol.to_owned(),
            symbol: symbol.to_owned(),
            name: name.to_owned(),
            price,
            previous_price: price,
            change: 0.0,
            change_percent: change,
            market_cap: cap,
            volume: 0,
            sector: sector.to_owned(),
        }
    }

    fn sample() -> Vec<Stock> {
        vec![
            stock("TCS", "Tata Consultancy Services", "IT", 3456.0, 1.2, 9e11),
            stock("INFY", "Infosys", "IT", 1435.0, -0.8, 5e11),
            stock("SBIN", "State Bank of India", "Banking", 624.0, 2.4, 4e11),
        ]
    }

    #[test]
    fn empty_search_passes_everything() {
        assert_eq!(filter_by_search(&sample(), "  ").len(), 3);
    }

    #[test]
    fn search_matches_symbol_and_name() {
        let by_symbol = filter_by_search(&sample(), "tcs");
        assert_eq!(by_symbol.len(), 2); // TCS plus "Tata Consultancy Services"
        let by_name = filter_by_search(&sample(), "infosys");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].symbol, "INFY");
    }

    #[test]
    fn sector_all_is_passthrough() {
        assert_eq!(filter_by_sector(&sample(), ALL_SECTORS).len(), 3);
        let banking = filter_by_sector(&sample(), "Banking");
        assert_eq!(banking.len(), 1);
        assert_eq!(banking[0].symbol, "SBIN");
    }

    #[test]
    fn sort_by_change_descending() {
        let mut stocks = sample();
        sort_stocks(&mut stocks, SortKey::ChangePercent, SortDirection::Descending);
        let symbols = stocks.iter().map(|s| s.symbol.as_str()).collect::<Vec<_>>();
        assert_eq!(symbols, ["SBIN", "TCS", "INFY"]);
    }

    #[test]
    fn sector_rollup_averages_change() {
        let rollup = sector_performance(&sample());
        let it = rollup.iter().find(|entry| entry.name == "IT").unwrap();
        assert_eq!(it.stock_count, 2);
        assert!((it.average_change_percent - 0.2).abs() < 1e-4);
        // Largest sector by market cap sorts first.
        assert_eq!(rollup[0].name, "IT");
    }
}
