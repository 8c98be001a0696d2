use serde::Serialize;

/// Live wpm observed at `t` seconds into the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WpmSample {
    pub t: f64,
    pub wpm: u32,
}

impl WpmSample {
    pub fn new(t: f64, wpm: u32) -> Self {
        Self { t, wpm }
    }
}

impl From<WpmSample> for (f64, f64) {
    fn from(p: WpmSample) -> Self {
        (p.t, p.wpm as f64)
    }
}

/// Per-tick wpm history of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WpmSeries {
    samples: Vec<WpmSample>,
}

impl WpmSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: WpmSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[WpmSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn peak(&self) -> u32 {
        self.samples.iter().map(|s| s.wpm).max().unwrap_or(0)
    }

    pub fn mean(&self) -> Option<f64> {
        match self.samples.len() {
            0 => None,
            n => Some(self.samples.iter().map(|s| s.wpm as f64).sum::<f64>() / n as f64),
        }
    }

    /// Population standard deviation of the sampled wpm; lower is steadier
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self
            .samples
            .iter()
            .map(|s| {
                let diff = mean - s.wpm as f64;
                diff * diff
            })
            .sum::<f64>()
            / self.samples.len() as f64;

        Some(variance.sqrt())
    }

    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.samples.iter().copied().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[u32]) -> WpmSeries {
        let mut s = WpmSeries::new();
        for (i, v) in values.iter().enumerate() {
            s.push(WpmSample::new(i as f64 * 0.1, *v));
        }
        s
    }

    #[test]
    fn test_empty_series() {
        let s = WpmSeries::new();
        assert_eq!(s.mean(), None);
        assert_eq!(s.std_dev(), None);
        assert_eq!(s.peak(), 0);
        assert!(s.coords().is_empty());
    }

    #[test]
    fn test_mean_and_peak() {
        let s = series(&[10, 20, 30, 15, 22]);
        assert_eq!(s.mean(), Some(19.4));
        assert_eq!(s.peak(), 30);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn test_std_dev() {
        let s = series(&[100, 120, 90, 102, 94]);
        assert!((s.std_dev().unwrap() - 10.322790320451151).abs() < 1e-9);
        assert_eq!(series(&[5, 5, 5]).std_dev(), Some(0.0));
        assert_eq!(series(&[42]).std_dev(), Some(0.0));
    }

    #[test]
    fn test_coords() {
        let s = series(&[0, 60]);
        assert_eq!(s.coords(), vec![(0.0, 0.0), (0.1, 60.0)]);
    }
}
