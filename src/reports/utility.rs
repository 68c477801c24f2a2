/// Fraction of `total` made up by `part`. Returns 0.0 when `total` is zero.
pub fn share(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Rounds to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Items whose 1-based position is within the first `n` or the last `n`.
///
/// Each item appears once, so a series shorter than `2 * n` comes back whole.
pub fn head_tail<T>(items: &[T], n: usize) -> Vec<&T> {
    let len = items.len();
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let position = i + 1;
            position <= n || position + n > len
        })
        .map(|(_, item)| item)
        .collect()
}
