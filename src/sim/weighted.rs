//! Weighted random selection
//!
//! One draw walks the cumulative weights; sampling several distinct entries
//! repeats that draw and removes the winner each time.

use rand::Rng;

/// Index of one item picked proportionally to its weight
///
/// Returns `None` for an empty slice. Non-positive totals fall back to a
/// uniform pick so zero-weight tables still produce something.
pub fn weighted_index<R: Rng>(rng: &mut R, weights: &[f32]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f32 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return Some(rng.random_range(0..weights.len()));
    }

    let mut r = rng.random::<f32>() * total;
    for (i, w) in weights.iter().enumerate() {
        r -= w.max(0.0);
        if r <= 0.0 {
            return Some(i);
        }
    }
    // Rounding left a sliver of `r`; the last positive weight owns it
    weights.iter().rposition(|w| *w > 0.0)
}

/// Up to `count` distinct indices, each draw weighted over what remains
pub fn sample_without_replacement<R: Rng>(rng: &mut R, weights: &[f32], count: usize) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..weights.len()).collect();
    let mut picked = Vec::with_capacity(count.min(pool.len()));

    while picked.len() < count && !pool.is_empty() {
        let pool_weights: Vec<f32> = pool.iter().map(|&i| weights[i]).collect();
        let Some(slot) = weighted_index(rng, &pool_weights) else {
            break;
        };
        picked.push(pool.remove(slot));
    }
    picked
}
