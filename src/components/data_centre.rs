//! On-site data centre: a flexible, schedulable electrical load with no
//! site-level baseline of its own.

use crate::sim::types::{ReportData, TempSum};
use crate::task::DataCentreConfig;

#[derive(Debug, Clone)]
pub struct DataCentre {
    config: DataCentreConfig,
}

impl DataCentre {
    pub fn new(config: DataCentreConfig) -> Self {
        Self { config }
    }

    /// Delivers its rated load for the interval (phase 4), throttled back if
    /// the timestep's demand so far already exceeds `future_energy_kwh` —
    /// the site's forward-looking demand estimate. Unlike the EV charger,
    /// there is no unthrottled site demand behind this component: absence
    /// means zero contribution, handled by the caller never constructing one.
    pub fn step(&self, t: usize, interval_h: f64, future_energy_kwh: f64, sum: &mut TempSum, report: Option<&mut ReportData>) {
        let target = self.config.rated_power_kw * interval_h;
        let current_demand = sum.elec_e[t];
        let delivered = if current_demand <= future_energy_kwh {
            target
        } else {
            (target - (current_demand - future_energy_kwh)).clamp(0.0, target)
        };
        sum.elec_e[t] += delivered;

        if let Some(report) = report {
            report.record("data_centre_kwh", t, sum.elec_e.len(), delivered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ComponentLifecycle;

    fn dc(rated_power_kw: f64) -> DataCentre {
        DataCentre::new(DataCentreConfig {
            lifecycle: ComponentLifecycle {
                incumbent: false,
                age_years: 0.0,
                lifetime_years: 15.0,
            },
            rated_power_kw,
        })
    }

    #[test]
    fn draws_rated_power_when_future_demand_is_light() {
        let mut sum = TempSum::new(1);
        dc(4.0).step(0, 0.5, 10.0, &mut sum, None);
        assert_eq!(sum.elec_e[0], 2.0);
    }

    #[test]
    fn throttles_fully_when_current_demand_leaves_no_headroom() {
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 5.0;
        // target = 2.0 kWh, but current demand is already 2.0 kWh above the
        // 3.0 kWh future estimate, leaving no headroom.
        dc(4.0).step(0, 0.5, 3.0, &mut sum, None);
        assert_eq!(sum.elec_e[0], 5.0);
    }

    #[test]
    fn throttles_partially_to_the_remaining_headroom() {
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 4.0;
        // target = 2.0 kWh, current demand is 1.0 kWh above the 3.0 kWh
        // future estimate, so only 1.0 kWh of headroom remains.
        dc(4.0).step(0, 0.5, 3.0, &mut sum, None);
        assert_eq!(sum.elec_e[0], 5.0);
    }
}
