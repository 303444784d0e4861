use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Abbreviates a large value with a K/M/B/T suffix.
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if magnitude >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

pub fn format_currency(value: f64) -> String {
    format!("\u{20b9}{}", format_compact(value))
}

pub fn format_percent(percent: f32) -> String {
    let sign = if percent > 0.0 { "+" } else { "" };
    format!("{sign}{percent:.2}%")
}

/// Low-priced instruments get an extra decimal so small moves stay visible.
pub fn format_price(price: f64) -> String {
    if price < 10.0 {
        format!("{price:.3}")
    } else {
        format!("{price:.2}")
    }
}

pub fn stable_hash(id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic pseudo-random pair in [-1, 1] x [-1, 1], derived from the id
/// so the same instrument lands in the same spot on every run.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let hash = stable_hash(id);

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Deterministic value in [0, 1] derived from the id.
pub fn stable_unit(id: &str) -> f32 {
    ((stable_hash(id) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_suffixes() {
        assert_eq!(format_compact(2_450_000_000_000.0), "2.45T");
        assert_eq!(format_compact(1_230_000_000.0), "1.23B");
        assert_eq!(format_compact(5_600_000.0), "5.60M");
        assert_eq!(format_compact(7_890.0), "7.89K");
        assert_eq!(format_compact(999.0), "999");
    }

    #[test]
    fn percent_sign_only_on_gains() {
        assert_eq!(format_percent(2.5), "+2.50%");
        assert_eq!(format_percent(-1.25), "-1.25%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn price_decimals_adapt() {
        assert_eq!(format_price(9.1234), "9.123");
        assert_eq!(format_price(2584.5), "2584.50");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x1, y1) = stable_pair("RELIANCE");
        let (x2, y2) = stable_pair("RELIANCE");
        assert_eq!((x1, y1), (x2, y2));
        assert!((-1.0..=1.0).contains(&x1));
        assert!((-1.0..=1.0).contains(&y1));
        assert_ne!(stable_pair("TCS"), stable_pair("INFY"));
    }
}
