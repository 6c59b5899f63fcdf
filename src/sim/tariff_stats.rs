//! Rolling-day tariff statistics shared by DHW charging and the
//! `CONSUME_PLUS` battery mode.
//!
//! Both consumers gate opportunistic charging on "is the current price
//! cheap relative to today". `DayTariffStats` gives them the same answer:
//! the window is the trailing day (the last `steps_per_day` timesteps up to
//! and including the current one, shorter at the start of the series), and
//! the percentile is the window median. Using one shared helper, rather
//! than two ad hoc computations, is what keeps DHW and `CONSUME_PLUS`
//! consistent with each other.

/// Precomputed per-timestep rolling statistics over a tariff series.
#[derive(Debug, Clone)]
pub struct DayTariffStats {
    day_average: Vec<f64>,
    day_percentile: Vec<f64>,
}

impl DayTariffStats {
    /// Builds rolling statistics for `tariff` using a window of
    /// `steps_per_day` timesteps (clamped to the available history at the
    /// start of the series).
    pub fn compute(tariff: &[f64], steps_per_day: usize) -> Self {
        let n = tariff.len();
        let window = steps_per_day.max(1);
        let mut day_average = Vec::with_capacity(n);
        let mut day_percentile = Vec::with_capacity(n);

        for t in 0..n {
            let start = t.saturating_sub(window - 1);
            let slice = &tariff[start..=t];
            let sum: f64 = slice.iter().sum();
            day_average.push(sum / slice.len() as f64);
            day_percentile.push(median(slice));
        }

        Self {
            day_average,
            day_percentile,
        }
    }

    pub fn average(&self, t: usize) -> f64 {
        self.day_average[t]
    }

    pub fn percentile(&self, t: usize) -> f64 {
        self.day_percentile[t]
    }

    /// Whether the tariff at `t` qualifies as "cheap": at or below both the
    /// rolling-day average and the rolling-day median.
    pub fn is_cheap(&self, tariff_t: f64, t: usize) -> bool {
        tariff_t <= self.average(t) && tariff_t <= self.percentile(t)
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_series_average_equals_value() {
        let tariff = vec![0.2; 10];
        let stats = DayTariffStats::compute(&tariff, 4);
        for t in 0..10 {
            assert!((stats.average(t) - 0.2).abs() < 1e-12);
            assert!((stats.percentile(t) - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn window_clamps_at_series_start() {
        let tariff = vec![1.0, 2.0, 3.0, 4.0];
        let stats = DayTariffStats::compute(&tariff, 48);
        // whole history so far is in-window since steps_per_day exceeds series length
        assert!((stats.average(3) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn is_cheap_requires_both_conditions() {
        let tariff = vec![0.1, 0.5, 0.3, 0.1];
        let stats = DayTariffStats::compute(&tariff, 4);
        assert!(stats.is_cheap(0.1, 3));
        assert!(!stats.is_cheap(0.5, 3));
    }
}
