//! Derived progress percentages. Never stored; recomputed at every read so
//! displayed numbers cannot drift from the underlying records.

/// Percentage of `current` against an optional numeric `target`.
///
/// Total over all inputs: a missing or non-positive target yields 0, the
/// result is clamped to 0..=100.
pub fn percent(current: i64, target: Option<i64>) -> u8 {
    let Some(target) = target.filter(|t| *t > 0) else {
        return 0;
    };
    let pct = (current as f64 * 100.0 / target as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// `done` out of `total` as a percentage; 0 when `total` is 0.
pub fn ratio_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done as f64 * 100.0 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}
