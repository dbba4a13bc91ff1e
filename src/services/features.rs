use std::f64::consts::PI;

use crate::models::solar::{FeaturePair, Month};

/// Cyclical month encoding for the prediction model.
///
/// `angle = 2π × index / 12` places each month on the unit circle, so the
/// model sees December and January as numerically adjacent instead of
/// eleven ordinal steps apart. Pure and total: every `Month` has a defined
/// angle, and the only failure mode of the original string lookup (an
/// unrecognized label) is ruled out by the closed enum.
pub fn encode(month: Month) -> FeaturePair {
    let angle = 2.0 * PI * month.index() as f64 / 12.0;
    FeaturePair {
        sin: angle.sin(),
        cos: angle.cos(),
    }
}
