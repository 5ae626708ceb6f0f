//! Similarity tier normalization: continuous similarity → bounded points
//!
//! Five fixed tiers, each with its own ceiling and independent linear
//! interpolation. Crossing a tier boundary resets progress to the new tier's
//! bottom, so a similarity just below a boundary outscores one just above
//! it. That discontinuity is intentional: it keeps borderline similarities
//! from inflating into the next tier's point range.

/// Dictionary-default ceiling the tier table is defined against.
pub const DEFAULT_MAX_POINTS: f64 = 25.0;

/// (tier floor, tier ceiling-exclusive, point ceiling at the default scale)
const TIERS: &[(f64, f64, f64)] = &[
    (0.0, 0.35, 0.0),   // NONE
    (0.35, 0.50, 8.0),  // LOW
    (0.50, 0.65, 15.0), // MEDIUM
    (0.65, 0.80, 22.0), // HIGH
    (0.80, 1.0, 25.0),  // EXCEPTIONAL (upper bound inclusive)
];

/// Maps a cosine-style similarity in [0,1] onto tiered, bounded points.
pub struct SimilarityTierNormalizer {
    max_points: f64,
}

impl Default for SimilarityTierNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

impl SimilarityTierNormalizer {
    /// A normalizer whose tier ceilings are scaled proportionally to
    /// `max_points` (the table is defined against a ceiling of 25).
    pub fn new(max_points: f64) -> Self {
        Self { max_points }
    }

    /// Convert a similarity into points. Truncates to two decimals, never
    /// rounds up. Out-of-range inputs are clamped to [0,1].
    pub fn normalize(&self, similarity: f64) -> f64 {
        let s = similarity.clamp(0.0, 1.0);
        let scale = self.max_points / DEFAULT_MAX_POINTS;

        for &(lo, hi, ceiling) in TIERS {
            let in_tier = if hi >= 1.0 {
                s >= lo && s <= hi
            } else {
                s >= lo && s < hi
            };
            if in_tier {
                if ceiling == 0.0 {
                    return 0.0;
                }
                let progress = (s - lo) / (hi - lo);
                return floor2dp(progress * ceiling * scale);
            }
        }

        0.0
    }
}

/// Truncate to two decimal places.
fn floor2dp(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}
