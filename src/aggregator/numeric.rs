//! Numeric helpers shared by the aggregation passes.

/// Median of a sample; 0.0 for an empty sample
///
/// Even-length samples average the two middle values.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentage of samples strictly below `threshold`; 0.0 for an empty sample
pub fn pct_below(samples: &[f64], threshold: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let below = samples.iter().filter(|&&v| v < threshold).count();
    below as f64 / samples.len() as f64 * 100.0
}

/// Z score for a 95% confidence interval
pub const WILSON_Z_95: f64 = 1.96;

/// Wilson score interval for `successes / trials`, as fractions in [0, 1]
///
/// Returns None for zero trials.
pub fn wilson_interval(successes: u32, trials: u32, z: f64) -> Option<(f64, f64)> {
    if trials == 0 {
        return None;
    }

    let n = trials as f64;
    let p = successes.min(trials) as f64 / n;
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = z * ((p * (1.0 - p) / n) + z2 / (4.0 * n * n)).sqrt() / denom;

    Some(((center - margin).max(0.0), (center + margin).min(1.0)))
}

/// Unit forward vector for a view direction given in degrees
fn forward(pitch_deg: f64, yaw_deg: f64) -> [f64; 3] {
    let (pitch, yaw) = (pitch_deg.to_radians(), yaw_deg.to_radians());
    [
        pitch.cos() * yaw.cos(),
        pitch.cos() * yaw.sin(),
        -pitch.sin(),
    ]
}

/// Angle between two view directions in degrees, within [0, 180]
pub fn view_angle_delta(pitch_a: f64, yaw_a: f64, pitch_b: f64, yaw_b: f64) -> f64 {
    let a = forward(pitch_a, yaw_a);
    let b = forward(pitch_b, yaw_b);
    let dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2];

    dot.clamp(-1.0, 1.0).acos().to_degrees().clamp(0.0, 180.0)
}

/// Tick delta to milliseconds
pub fn ticks_to_ms(ticks: i64, tick_rate: f64) -> f64 {
    if tick_rate <= 0.0 {
        return 0.0;
    }
    ticks as f64 / tick_rate * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0]), 3.0);
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_pct_below() {
        assert_eq!(pct_below(&[], 5.0), 0.0);
        assert_eq!(pct_below(&[1.0, 4.9, 5.0, 10.0], 5.0), 50.0);
    }

    #[test]
    fn test_wilson_interval() {
        assert_eq!(wilson_interval(0, 0, WILSON_Z_95), None);

        let (lo, hi) = wilson_interval(5, 10, WILSON_Z_95).unwrap();
        assert!(approx(lo, 0.236593), "lo = {}", lo);
        assert!(approx(hi, 0.763407), "hi = {}", hi);

        let (lo, hi) = wilson_interval(1, 1, WILSON_Z_95).unwrap();
        assert!(lo > 0.2 && lo < 0.21);
        assert!(approx(hi, 1.0));
    }

    #[test]
    fn test_view_angle_delta() {
        assert!(approx(view_angle_delta(0.0, 0.0, 0.0, 0.0), 0.0));
        assert!(approx(view_angle_delta(0.0, 0.0, 0.0, 90.0), 90.0));
        assert!(approx(view_angle_delta(0.0, 0.0, 0.0, 180.0), 180.0));
        assert!(approx(view_angle_delta(10.0, 350.0, 10.0, -10.0), 0.0));
        assert!(approx(view_angle_delta(0.0, 45.0, 3.0, 45.0), 3.0));
    }

    #[test]
    fn test_ticks_to_ms() {
        assert_eq!(ticks_to_ms(64, 64.0), 1000.0);
        assert_eq!(ticks_to_ms(32, 64.0), 500.0);
        assert_eq!(ticks_to_ms(10, 0.0), 0.0);
    }
}
