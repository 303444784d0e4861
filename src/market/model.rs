/// One tradable instrument in a market snapshot. Ids are stable across
/// refreshes; no two stocks in a snapshot share one.
#[derive(Clone, Debug)]
pub struct Stock {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub previous_price: f64,
    pub change: f64,
    pub change_percent: f32,
    pub market_cap: f64,
    pub volume: u64,
    pub sector: String,
}

impl Stock {
    pub fn is_gaining(&self) -> bool {
        self.change_percent > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    MarketCap,
    Price,
    ChangePercent,
    Name,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::MarketCap => "Market cap",
            Self::Price => "Price",
            Self::ChangePercent => "Change %",
            Self::Name => "Name",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "\u{2191}",
            Self::Descending => "\u{2193}",
        }
    }
}

#[derive(Clone, Debug)]
pub struct SectorPerformance {
    pub name: String,
    pub average_change_percent: f32,
    pub total_market_cap: f64,
    pub stock_count: usize,
}
