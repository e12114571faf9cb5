//! Numeric helpers shared by the learning and analysis layers

/// Normalize weights to probabilities that sum to 1.0.
///
/// # Returns
///
/// - `Some(Vec<f64>)` containing normalized probabilities
/// - `None` if the total is zero, negative or not finite
///
/// # Examples
///
/// ```
/// use morris_rl::utils::normalize_weights;
///
/// let normalized = normalize_weights(&[1.0, 2.0, 1.0]).unwrap();
/// assert_eq!(normalized, vec![0.25, 0.5, 0.25]);
///
/// assert_eq!(normalize_weights(&[0.0, 0.0]), None);
/// assert_eq!(normalize_weights(&[f64::INFINITY, 1.0]), None);
/// ```
pub fn normalize_weights(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    let normalized: Vec<f64> = weights.iter().map(|w| w / total).collect();
    normalized
        .iter()
        .all(|p| p.is_finite())
        .then_some(normalized)
}

/// Inverse-CDF lookup over an ordered list of probabilities.
///
/// Accumulates the probabilities in order and returns the index of the first
/// entry whose running sum meets or exceeds `draw`. Entries without mass are
/// never selected by the lookup itself; if rounding keeps the running sum
/// below `draw`, the last index is returned.
///
/// # Returns
///
/// `None` only when `probabilities` is empty.
///
/// # Examples
///
/// ```
/// use morris_rl::utils::inverse_cdf_index;
///
/// let probabilities = [0.2, 0.5, 0.3];
/// assert_eq!(inverse_cdf_index(probabilities, 0.1), Some(0));
/// assert_eq!(inverse_cdf_index(probabilities, 0.2), Some(0));
/// assert_eq!(inverse_cdf_index(probabilities, 0.65), Some(1));
/// assert_eq!(inverse_cdf_index(probabilities, 0.99), Some(2));
/// ```
pub fn inverse_cdf_index<I>(probabilities: I, draw: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut cumulative = 0.0;
    let mut last = None;
    for (index, probability) in probabilities.into_iter().enumerate() {
        cumulative += probability;
        if probability > 0.0 && cumulative >= draw {
            return Some(index);
        }
        last = Some(index);
    }
    last
}

/// Visit-count weighted sum of `(value, count)` pairs.
///
/// Returns the weighted sum and the total count so that callers can check the
/// count against a parent record before dividing.
pub fn weighted_sum<I>(pairs: I) -> (f64, u64)
where
    I: IntoIterator<Item = (f64, u64)>,
{
    pairs
        .into_iter()
        .fold((0.0, 0), |(sum, total), (value, count)| {
            (sum + value * count as f64, total + count)
        })
}
