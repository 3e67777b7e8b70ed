//! Joint and digit samplers, plus small draw helpers shared by the builders.
//!
//! Every function takes the random source explicitly, so a seeded `StdRng`
//! reproduces a whole run.

use std::collections::BTreeSet;

use rand::{
    seq::{index, IndexedRandom},
    Rng,
};

use hub_contracts::{
    cohort::Flag,
    error::{HubError, HubResult},
    schema::{DIGIT_SITES, HAND_DIGITS, JOINT_SITES},
    visit::{DigitExam, JointExam},
};

/// At most this many digits are affected on one visit.
pub const MAX_DACTYLITIS: usize = 3;

/// Draw the swollen and tender joints of one visit.
///
/// The swollen count is uniform on `[0, max_swollen]`; the tender count is
/// uniform on `[0, floor(0.66 * swollen)]` and the tender sites are drawn from
/// the swollen ones, so tender is always a subset of swollen.
pub fn sample_joints<R: Rng + ?Sized>(rng: &mut R, max_swollen: usize) -> HubResult<JointExam> {
    if max_swollen > JOINT_SITES.len() {
        return Err(HubError::InvalidParameter {
            reason: format!(
                "cannot draw {} swollen joints from {} sites",
                max_swollen,
                JOINT_SITES.len()
            ),
        });
    }

    let swollen_count = rng.random_range(0..=max_swollen);
    let swollen: Vec<usize> = index::sample(rng, JOINT_SITES.len(), swollen_count).into_vec();

    let tender_count = rng.random_range(0..=swollen_count * 66 / 100);
    let tender = index::sample(rng, swollen_count, tender_count)
        .iter()
        .map(|i| swollen[i])
        .collect();

    Ok(JointExam {
        swollen: swollen.into_iter().collect(),
        tender,
    })
}

/// Draw the digits with dactylitis on one visit.
///
/// Zero to three digits, with the hand share uniform on `[total / 2, total]`.
/// Hand and foot digits are sampled from their own halves of `DIGIT_SITES`.
pub fn sample_dactylitis<R: Rng + ?Sized>(rng: &mut R) -> DigitExam {
    let total = rng.random_range(0..=MAX_DACTYLITIS);
    let hands = rng.random_range(total / 2..=total);
    let feet = total - hands;

    let foot_digits = DIGIT_SITES.len() - HAND_DIGITS;
    let mut affected: BTreeSet<usize> = index::sample(rng, HAND_DIGITS, hands).iter().collect();
    affected.extend(index::sample(rng, foot_digits, feet).iter().map(|i| HAND_DIGITS + i));

    DigitExam { affected }
}

/// One `SI`/`NO` flag per site in `0..len`, `SI` where the site is in `set`.
pub fn expand_flags(set: &BTreeSet<usize>, len: usize) -> Vec<Flag> {
    (0..len).map(|i| Flag::from(set.contains(&i))).collect()
}

/// A Bernoulli flag. `p` must be a constant in `[0, 1]`.
pub fn flag<R: Rng + ?Sized>(rng: &mut R, p: f64) -> Flag {
    Flag::from(rng.random_bool(p))
}

/// One flag per probability, in order.
pub fn flags<R: Rng + ?Sized, const N: usize>(rng: &mut R, rates: &[f64; N]) -> [Flag; N] {
    let mut out = [Flag::No; N];
    for (slot, p) in out.iter_mut().zip(rates) {
        *slot = flag(rng, *p);
    }
    out
}

/// Uniform choice from a fixed pool.
pub fn pick<'a, R: Rng + ?Sized, T>(rng: &mut R, pool: &'a [T], what: &str) -> HubResult<&'a T> {
    pool.choose(rng).ok_or_else(|| HubError::InvalidParameter {
        reason: format!("cannot draw a {} from an empty pool", what),
    })
}
