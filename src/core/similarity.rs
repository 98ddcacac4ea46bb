/// Cosine similarity between two equal-length vectors
///
/// Returns 0.0 when either vector has zero norm.
///
/// # Arguments
/// * `a` - First vector
/// * `b` - Second vector, compared over the common prefix
#[inline]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    dot / denominator
}

/// Median of the present values, `None` if there are none
///
/// Even-length inputs average the two middle values.
pub fn median(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let mut present: Vec<f64> = values.into_iter().flatten().collect();
    if present.is_empty() {
        return None;
    }

    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = present.len() / 2;

    if present.len() % 2 == 0 {
        Some((present[mid - 1] + present[mid]) / 2.0)
    } else {
        Some(present[mid])
    }
}

/// Per-100-unit normalization; `None` when the quotient is undefined
#[inline]
pub fn per_100(value: f64, serving_size: f64) -> Option<f64> {
    if serving_size == 0.0 {
        return None;
    }
    let scaled = value / serving_size * 100.0;
    scaled.is_finite().then_some(scaled)
}
