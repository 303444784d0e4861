use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, bail};
use clap::Parser;

use marketmap::app::MarketMapApp;
use marketmap::market::{MockFeed, SharedFeed, builtin_listings, load_watchlist};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Market data source. Only the seeded mock feed is wired up.
    #[arg(long, default_value = "mock")]
    feed: String,

    /// JSON watchlist overriding the built-in catalog.
    #[arg(long)]
    watchlist: Option<PathBuf>,

    /// Auto-refresh interval in seconds.
    #[arg(long, default_value_t = 8.0)]
    refresh_secs: f32,

    /// Seed for the mock price tape.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Pad the canvas with this many inert filler bubbles.
    #[arg(long, default_value_t = 0)]
    fillers: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.feed != "mock" {
        bail!("unknown feed {:?}; only \"mock\" is available", args.feed);
    }

    let listings = match &args.watchlist {
        Some(path) => load_watchlist(path)
            .with_context(|| format!("loading watchlist {}", path.display()))?,
        None => builtin_listings(),
    };

    let feed: SharedFeed = Arc::new(Mutex::new(MockFeed::new(listings, args.seed)));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "marketmap",
        options,
        Box::new(move |cc| {
            Ok(Box::new(MarketMapApp::new(
                cc,
                feed,
                args.refresh_secs,
                args.fillers,
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("eframe terminated: {error}"))
}
