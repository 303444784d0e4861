use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::catalog::Listing;
use super::model::Stock;

/// Source of market snapshots. Implementations are swappable; remote
/// providers would implement this same trait behind their own transport.
pub trait MarketFeed {
    fn name(&self) -> &'static str;

    /// Produces the next full snapshot. Ids are stable across calls.
    fn snapshot(&mut self) -> Result<Vec<Stock>>;
}

pub type SharedFeed = Arc<Mutex<dyn MarketFeed + Send>>;

/// Runs one snapshot on a background thread, reporting over a channel so the
/// UI thread never blocks on data collection.
pub fn spawn_snapshot(feed: SharedFeed) -> Receiver<Result<Vec<Stock>, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = match feed.lock() {
            Ok(mut feed) => feed.snapshot().map_err(|error| error.to_string()),
            Err(_) => Err("market feed lock poisoned".to_owned()),
        };
        let _ = tx.send(result);
    });

    rx
}

/// Seeded simulated feed: quotes drift around the catalog base prices. The
/// same seed replays the same tape, which keeps tests and demo sessions
/// reproducible.
pub struct MockFeed {
    listings: Vec<Listing>,
    shares_outstanding: Vec<f64>,
    current: Vec<Stock>,
    rng: StdRng,
}

impl MockFeed {
    pub fn new(listings: Vec<Listing>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        // Shares outstanding are fixed at feed creation so market cap moves
        // with price, not independently of it.
        let shares_outstanding = listings
            .iter()
            .map(|_| rng.random_range(500.0..2500.0) * 1_000_000.0)
            .collect();

        Self {
            listings,
            shares_outstanding,
            current: Vec::new(),
            rng,
        }
    }

    fn initial_snapshot(&mut self) -> Vec<Stock> {
        self.listings
            .iter()
            .zip(self.shares_outstanding.iter())
            .map(|(listing, &shares)| {
                let price = listing.base_price;
                let previous_price = price * (1.0 - self.rng.random_range(-0.05..0.05));
                let change = price - previous_price;

                Stock {
                    id: listing.symbol.clone(),
                    symbol: listing.symbol.clone(),
                    name: listing.name.clone(),
                    price,
                    previous_price,
                    change,
                    change_percent: change_percent(price, previous_price),
                    market_cap: price * shares,
                    volume: self.rng.random_range(1_000_000..11_000_000),
                    sector: listing.sector.clone(),
                }
            })
            .collect()
    }

    fn advance(&mut self) {
        for (stock, &shares) in self.current.iter_mut().zip(self.shares_outstanding.iter()) {
            let previous_price = stock.price;
            let drift = (self.rng.random_range(0.0..1.0) - 0.45) * previous_price * 0.05;
            let price = (previous_price + drift).max(0.01);

            stock.previous_price = previous_price;
            stock.price = price;
            stock.change = price - previous_price;
            stock.change_percent = change_percent(price, previous_price);
            stock.market_cap = price * shares;
            stock.volume = self.rng.random_range(1_000_000..11_000_000);
        }
    }
}

impl MarketFeed for MockFeed {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn snapshot(&mut self) -> Result<Vec<Stock>> {
        if self.current.is_empty() {
            self.current = self.initial_snapshot();
        } else {
            self.advance();
        }
        Ok(self.current.clone())
    }
}

fn change_percent(current: f64, previous: f64) -> f32 {
    if previous.abs() < f64::EPSILON {
        0.0
    } else {
        (((current - previous) / previous) * 100.0) as f32
    }
}
