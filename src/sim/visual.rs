use crate::util::stable_unit;

/// Performance buckets, ordered from strongest gain to strongest loss.
/// Thresholds are fixed at +/-2, +/-5 and +/-8 percent with a
/// strictly-greater-than convention, so 0.0 falls on the losing side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PerfBucket {
    StrongGain,
    Gain,
    MildGain,
    SlightGain,
    SlightLoss,
    MildLoss,
    Loss,
    StrongLoss,
}

impl PerfBucket {
    /// Total over all f32 values: every input maps to exactly one bucket.
    pub fn of(change_percent: f32) -> Self {
        if change_percent.is_nan() {
            return Self::SlightLoss;
        }

        if change_percent > 8.0 {
            Self::StrongGain
        } else if change_percent > 5.0 {
            Self::Gain
        } else if change_percent > 2.0 {
            Self::MildGain
        } else if change_percent > 0.0 {
            Self::SlightGain
        } else if change_percent > -2.0 {
            Self::SlightLoss
        } else if change_percent > -5.0 {
            Self::MildLoss
        } else if change_percent > -8.0 {
            Self::Loss
        } else {
            Self::StrongLoss
        }
    }

    pub fn is_gain(self) -> bool {
        matches!(
            self,
            Self::StrongGain | Self::Gain | Self::MildGain | Self::SlightGain
        )
    }
}

/// Maps a raw weight metric (market cap) onto a bubble radius in pixels.
#[derive(Clone, Copy, Debug)]
pub struct RadiusScale {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Fraction of the size range used for per-id jitter. Jitter is
    /// deterministic in the id, so re-renders of the same data are stable.
    pub jitter: f32,
}

impl Default for RadiusScale {
    fn default() -> Self {
        Self {
            min_radius: 26.0,
            max_radius: 60.0,
            jitter: 0.06,
        }
    }
}

impl RadiusScale {
    /// Log-scaled radius so visual area tracks weight sub-linearly: small
    /// caps stay readable and giants do not swallow the canvas. Degenerate
    /// weight sets fall back to the minimum radius instead of dividing by
    /// zero.
    pub fn radius_of(&self, weight: f64, max_weight: f64, id: &str) -> f32 {
        if !weight.is_finite() || !max_weight.is_finite() || weight <= 0.0 || max_weight <= 0.0 {
            return self.min_radius;
        }

        let ratio = ((weight.min(max_weight) + 1.0).ln() / (max_weight + 1.0).ln()) as f32;
        let variance = 1.0 + ((stable_unit(id) * 2.0) - 1.0) * self.jitter;
        let radius = self.min_radius + (self.max_radius - self.min_radius) * ratio * variance;
        radius.clamp(self.min_radius, self.max_radius)
    }

    /// Largest possible inversion of weight ordering caused by jitter.
    pub fn jitter_bound(&self) -> f32 {
        (self.max_radius - self.min_radius) * self.jitter * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_threshold_falls_in_one_bucket() {
        assert_eq!(PerfBucket::of(9.0), PerfBucket::StrongGain);
        assert_eq!(PerfBucket::of(8.0), PerfBucket::Gain);
        assert_eq!(PerfBucket::of(5.0), PerfBucket::MildGain);
        assert_eq!(PerfBucket::of(2.0), PerfBucket::SlightGain);
        assert_eq!(PerfBucket::of(0.0), PerfBucket::SlightLoss);
        assert_eq!(PerfBucket::of(-2.0), PerfBucket::MildLoss);
        assert_eq!(PerfBucket::of(-5.0), PerfBucket::Loss);
        assert_eq!(PerfBucket::of(-8.0), PerfBucket::StrongLoss);
        assert_eq!(PerfBucket::of(-100.0), PerfBucket::StrongLoss);
    }

    #[test]
    fn non_finite_performance_is_still_bucketed() {
        assert_eq!(PerfBucket::of(f32::NAN), PerfBucket::SlightLoss);
        assert_eq!(PerfBucket::of(f32::INFINITY), PerfBucket::StrongGain);
        assert_eq!(PerfBucket::of(f32::NEG_INFINITY), PerfBucket::StrongLoss);
    }

    #[test]
    fn radius_stays_in_range() {
        let scale = RadiusScale::default();
        for weight in [0.0, 1.0, 1e6, 1e9, 1e12, 5e12] {
            let radius = scale.radius_of(weight, 1e12, "TEST");
            assert!(radius >= scale.min_radius && radius <= scale.max_radius);
        }
    }

    #[test]
    fn degenerate_weights_fall_back_to_min() {
        let scale = RadiusScale::default();
        assert_eq!(scale.radius_of(1e9, 0.0, "A"), scale.min_radius);
        assert_eq!(scale.radius_of(0.0, 1e9, "A"), scale.min_radius);
        assert_eq!(scale.radius_of(f64::NAN, 1e9, "A"), scale.min_radius);
        assert_eq!(scale.radius_of(1e9, f64::INFINITY, "A"), scale.min_radius);
    }

    #[test]
    fn ordering_by_weight_holds_within_jitter_bound() {
        let scale = RadiusScale::default();
        let max_weight = 1e12;
        let weights = [1e8, 5e8, 1e9, 5e9, 1e10, 1e11, 1e12];

        for (i, &small) in weights.iter().enumerate() {
            for &large in &weights[i + 1..] {
                let r_small = scale.radius_of(small, max_weight, "SMALL");
                let r_large = scale.radius_of(large, max_weight, "LARGE");
                assert!(
                    r_small <= r_large + scale.jitter_bound(),
                    "radius ordering inverted beyond jitter bound: {r_small} vs {r_large}"
                );
            }
        }
    }

    #[test]
    fn jitter_is_deterministic_per_id() {
        let scale = RadiusScale::default();
        let a = scale.radius_of(3e11, 1e12, "RELIANCE");
        let b = scale.radius_of(3e11, 1e12, "RELIANCE");
        assert_eq!(a, b);
    }
}
