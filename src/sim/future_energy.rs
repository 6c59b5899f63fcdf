//! Forward-looking net-demand estimate consulted by flexible loads.
//!
//! A flexible load (data centre, EV charger) decides whether it can run at
//! its full target this step or must throttle back by comparing the site's
//! demand so far this step against an estimate of what's coming. Since a
//! scenario's whole year of site data is known upfront, the estimate is
//! just the raw baseline electrical load summed over a forward window —
//! the same "trailing day" window size `DayTariffStats` uses, but looking
//! ahead instead of back.

/// Precomputed per-timestep forward energy estimate over `building_eload`.
#[derive(Debug, Clone)]
pub struct FutureEnergyEstimate {
    values: Vec<f64>,
}

impl FutureEnergyEstimate {
    /// Builds the estimate using a forward window of `window` timesteps
    /// immediately following each `t` (clamped at the series end).
    pub fn compute(building_eload: &[f64], window: usize) -> Self {
        let n = building_eload.len();
        let window = window.max(1);
        let mut values = Vec::with_capacity(n);

        for t in 0..n {
            let start = t + 1;
            let end = (start + window).min(n);
            let sum = building_eload.get(start..end).map(|s| s.iter().sum()).unwrap_or(0.0);
            values.push(sum);
        }

        Self { values }
    }

    pub fn at(&self, t: usize) -> f64 {
        self.values[t]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_the_forward_window() {
        let eload = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let estimate = FutureEnergyEstimate::compute(&eload, 2);
        assert_eq!(estimate.at(0), 5.0); // 2.0 + 3.0
        assert_eq!(estimate.at(2), 9.0); // 4.0 + 5.0
    }

    #[test]
    fn window_clamps_at_series_end() {
        let eload = vec![1.0, 2.0, 3.0];
        let estimate = FutureEnergyEstimate::compute(&eload, 10);
        assert_eq!(estimate.at(0), 5.0); // 2.0 + 3.0, nothing beyond
        assert_eq!(estimate.at(2), 0.0); // nothing ahead of the last step
    }
}
