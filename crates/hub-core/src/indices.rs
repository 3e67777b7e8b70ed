//! Base composite indices and the sub-scores derived from them.
//!
//! A visit samples one base index and derives its related columns from it as
//! `base * ratio` plus a small uniform jitter. Related columns therefore move
//! together instead of being independent noise.

use std::ops::RangeInclusive;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use hub_contracts::error::{HubError, HubResult};

/// Range of the disease-activity index.
pub const DISEASE_ACTIVITY_RANGE: RangeInclusive<f64> = 1.0..=10.0;

/// Range of the functional-disability index.
pub const FUNCTIONAL_DISABILITY_RANGE: RangeInclusive<f64> = 0.0..=3.0;

/// Range of the skin-involvement index at baseline.
pub const SKIN_INVOLVEMENT_RANGE: RangeInclusive<u32> = 2..=20;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// N(`mean`, `sd`). The mean must be finite and `sd` finite and
/// non-negative; `Normal::new` alone accepts a negative deviation.
pub fn normal(mean: f64, sd: f64) -> HubResult<Normal<f64>> {
    if !mean.is_finite() || !sd.is_finite() || sd < 0.0 {
        return Err(HubError::InvalidParameter {
            reason: format!("normal distribution N({}, {}) needs a finite mean and sd >= 0", mean, sd),
        });
    }
    Normal::new(mean, sd).map_err(|e| HubError::InvalidParameter {
        reason: format!("normal distribution N({}, {}): {}", mean, sd, e),
    })
}

/// Draw from N(`mean`, `sd`) and clamp into `range`.
pub fn bounded_normal<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    sd: f64,
    range: &RangeInclusive<f64>,
) -> HubResult<f64> {
    Ok(normal(mean, sd)?.sample(rng).clamp(*range.start(), *range.end()))
}

/// Disease-activity index: N(3.5, 1.5) in [1, 10], one decimal.
///
/// With `improve`, the value is scaled by U[0.6, 0.8] to model treatment
/// response and clamped again.
pub fn disease_activity<R: Rng + ?Sized>(rng: &mut R, improve: bool) -> HubResult<f64> {
    let mut value = bounded_normal(rng, 3.5, 1.5, &DISEASE_ACTIVITY_RANGE)?;
    if improve {
        value = (value * rng.random_range(0.6..=0.8))
            .clamp(*DISEASE_ACTIVITY_RANGE.start(), *DISEASE_ACTIVITY_RANGE.end());
    }
    Ok(round_to(value, 1))
}

/// Functional-disability index: N(1.2, 0.7) in [0, 3], two decimals.
///
/// With `improve`, the value is scaled by U[0.7, 0.85].
pub fn functional_disability<R: Rng + ?Sized>(rng: &mut R, improve: bool) -> HubResult<f64> {
    let mut value = bounded_normal(rng, 1.2, 0.7, &FUNCTIONAL_DISABILITY_RANGE)?;
    if improve {
        value *= rng.random_range(0.7..=0.85);
    }
    Ok(round_to(value, 2))
}

/// Skin-involvement index at baseline: uniform integer in [2, 20].
pub fn skin_involvement<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(SKIN_INVOLVEMENT_RANGE)
}

/// Skin-involvement index at follow-up: a fresh baseline draw minus
/// U[0, 5], never below 1.
pub fn skin_involvement_follow_up<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let baseline = skin_involvement(rng);
    baseline.saturating_sub(rng.random_range(0..=5)).max(1)
}

/// A sub-score derived from `base`: `base * ratio + U[-jitter, jitter]`,
/// clamped into `range`. Callers round to the column's precision.
pub fn derive<R: Rng + ?Sized>(
    rng: &mut R,
    base: f64,
    ratio: f64,
    jitter: f64,
    range: &RangeInclusive<f64>,
) -> f64 {
    let noise = if jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    (base * ratio + noise).clamp(*range.start(), *range.end())
}
