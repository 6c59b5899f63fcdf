//! EV charger bank: throttles the site's raw EV charging demand to the
//! installed charger capacity, then further against a forward-looking
//! demand estimate the way the data centre load does.
//!
//! The unthrottled demand (`SiteData::ev_eload`) is a site-level input
//! present regardless of scenario; an `EvCharger` component caps it at the
//! installed capacity and then at whatever headroom the forward estimate
//! leaves this step. `EvCharger::null()` passes the raw demand through
//! unthrottled by either, which is what a scenario with no EV charger
//! infrastructure means here.

use crate::sim::types::{ReportData, TempSum};
use crate::task::EvChargerConfig;

#[derive(Debug, Clone)]
pub struct EvCharger {
    config: Option<EvChargerConfig>,
}

impl EvCharger {
    pub fn new(config: EvChargerConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    pub fn null() -> Self {
        Self { config: None }
    }

    /// Delivers as much of the raw EV demand as the installed capacity
    /// allows (phase 4), throttled further if the timestep's demand so far
    /// already exceeds `future_energy_kwh`. A null charger has no hardware
    /// to throttle with, so it passes demand straight through regardless of
    /// the estimate.
    pub fn step(
        &self,
        t: usize,
        interval_h: f64,
        ev_demand_kwh: f64,
        future_energy_kwh: f64,
        sum: &mut TempSum,
        report: Option<&mut ReportData>,
    ) {
        let delivered = match self.config {
            Some(config) => {
                let capacity = config.charger_count as f64 * config.rated_power_kw * interval_h;
                let target = ev_demand_kwh.min(capacity);
                let current_demand = sum.elec_e[t];
                if current_demand <= future_energy_kwh {
                    target
                } else {
                    (target - (current_demand - future_energy_kwh)).clamp(0.0, target)
                }
            }
            None => ev_demand_kwh,
        };

        sum.elec_e[t] += delivered;

        if let Some(report) = report {
            report.record("ev_delivered_kwh", t, sum.elec_e.len(), delivered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ComponentLifecycle;

    #[test]
    fn null_charger_passes_demand_through_regardless_of_future_estimate() {
        let charger = EvCharger::null();
        let mut sum = TempSum::new(1);
        charger.step(0, 0.5, 3.0, 0.0, &mut sum, None);
        assert_eq!(sum.elec_e[0], 3.0);
    }

    fn charger(charger_count: usize, rated_power_kw: f64) -> EvCharger {
        EvCharger::new(EvChargerConfig {
            lifecycle: ComponentLifecycle {
                incumbent: false,
                age_years: 0.0,
                lifetime_years: 10.0,
            },
            charger_count,
            rated_power_kw,
        })
    }

    #[test]
    fn configured_charger_caps_at_installed_capacity() {
        let mut sum = TempSum::new(1);
        // capacity = 1 * 3kW * 0.5h = 1.5 kWh, demand 3.0 kWh requested
        charger(1, 3.0).step(0, 0.5, 3.0, f64::INFINITY, &mut sum, None);
        assert_eq!(sum.elec_e[0], 1.5);
    }

    #[test]
    fn configured_charger_throttles_to_future_energy_headroom() {
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 5.0;
        // target = 1.5 kWh, but current demand is already 2.0 kWh above the
        // 3.0 kWh future estimate, leaving no headroom.
        charger(1, 3.0).step(0, 0.5, 3.0, 3.0, &mut sum, None);
        assert_eq!(sum.elec_e[0], 5.0);
    }
}
