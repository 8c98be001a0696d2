use crate::time_series::WpmSample;

/// X (seconds) and Y (wpm) upper bounds for the results chart
pub fn compute_chart_params(samples: &[WpmSample], duration_secs: u64) -> (f64, f64) {
    let highest_wpm = samples.iter().map(|s| s.wpm).max().unwrap_or(0) as f64;

    let overall_duration = match samples.last() {
        Some(s) => s.t,
        None => duration_secs as f64,
    }
    .max(1.0);

    // an all-zero run still needs a visible y range
    (overall_duration, highest_wpm.max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_chart_params_empty() {
        let (x, y) = compute_chart_params(&[], 30);
        assert_eq!(x, 30.0);
        assert_eq!(y, 1.0);
    }

    #[test]
    fn test_compute_chart_params_uses_last_sample() {
        let samples = [
            WpmSample::new(0.1, 0),
            WpmSample::new(5.0, 48),
            WpmSample::new(12.5, 40),
        ];
        assert_eq!(compute_chart_params(&samples, 30), (12.5, 48.0));
    }

    #[test]
    fn test_compute_chart_params_short_run() {
        let samples = [WpmSample::new(0.3, 0)];
        assert_eq!(compute_chart_params(&samples, 30), (1.0, 1.0));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }
}
