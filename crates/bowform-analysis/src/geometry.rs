//! Geometry and statistics helpers shared by the analyzers.

use bowform_models::Landmark;

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`), 0.0 for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

/// Largest value, `None` for an empty slice.
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Angle of the line from `from` to `to` in degrees, `atan2(dy, dx)`.
pub fn line_angle_degrees(from: &Landmark, to: &Landmark) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Euclidean distance between each pair of consecutive points.
pub fn step_displacements(points: &[Landmark]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| pair[1].distance_2d(&pair[0]))
        .collect()
}

/// Largest absolute deviation from the mean.
pub fn max_deviation_from_mean(values: &[f64]) -> f64 {
    let avg = mean(values);
    values
        .iter()
        .map(|v| (v - avg).abs())
        .fold(0.0, f64::max)
}
