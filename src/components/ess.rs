//! Battery energy storage system: CONSUME and CONSUME_PLUS dispatch.

use crate::constants::ess as ess_const;
use crate::sim::tariff_stats::DayTariffStats;
use crate::sim::types::{ReportData, TempSum};
use crate::task::{BatteryMode, EssConfig};

/// A dispatchable battery. `Ess::null()` stands in for "no battery
/// configured" so the balancing loop's phase 5 call site is uniform
/// regardless of whether this scenario has a battery.
#[derive(Debug, Clone)]
pub struct Ess {
    config: Option<EssConfig>,
    soc_kwh: f64,
}

impl Ess {
    pub fn new(config: EssConfig) -> Self {
        let soc_kwh = config.initial_charge_kwh.clamp(0.0, config.capacity_kwh);
        Self {
            config: Some(config),
            soc_kwh,
        }
    }

    /// A zero-capacity, zero-power battery: every dispatch call is a no-op.
    pub fn null() -> Self {
        Self {
            config: None,
            soc_kwh: 0.0,
        }
    }

    /// Dispatches the battery against the current net demand (phase 5),
    /// mutating `sum.elec_e[t]` by the amount absorbed (charge, positive
    /// contribution) or released (discharge, negative contribution).
    pub fn step(
        &mut self,
        t: usize,
        interval_h: f64,
        tariff_t: f64,
        tariff_stats: &DayTariffStats,
        sum: &mut TempSum,
        report: Option<&mut ReportData>,
    ) {
        let Some(config) = self.config else {
            return;
        };

        let charge_max = config.charge_power_kw * interval_h;
        let discharge_max = config.discharge_power_kw * interval_h;
        let aux_kwh = config.capacity_kwh / ess_const::AUX_LOAD_DIVISOR * interval_h;

        let available_discharge = self.soc_kwh.min(discharge_max);
        let available_charge =
            ((config.capacity_kwh - self.soc_kwh) / (1.0 - ess_const::ROUND_TRIP_LOSS_FRACTION))
                .min(charge_max)
                .max(0.0);

        let demand = sum.elec_e[t];
        let mut charge = 0.0;
        let mut discharge = 0.0;

        if demand >= 0.0 {
            discharge = demand.min(available_discharge);
        } else {
            charge = (-demand).min(available_charge);
        }

        if config.mode == BatteryMode::ConsumePlus && self.soc_kwh / config.capacity_kwh < 0.75 {
            let is_cheap = tariff_t < tariff_stats.average(t) && tariff_t <= tariff_stats.percentile(t);
            if is_cheap {
                let headroom_to_target = (config.capacity_kwh * 0.75 - self.soc_kwh).max(0.0);
                let remaining_charge_budget = (available_charge - charge).max(0.0);
                let extra_charge = headroom_to_target.min(remaining_charge_budget);
                charge += extra_charge;
            }
        }

        let charge_into_soc = charge * (1.0 - ess_const::ROUND_TRIP_LOSS_FRACTION);
        self.soc_kwh = (self.soc_kwh + charge_into_soc - discharge - aux_kwh).clamp(0.0, config.capacity_kwh);

        sum.elec_e[t] += charge - discharge;

        if let Some(report) = report {
            let n = sum.elec_e.len();
            report.record("ess_soc_kwh", t, n, self.soc_kwh);
            report.record("ess_charge_kwh", t, n, charge);
            report.record("ess_discharge_kwh", t, n, discharge);
            report.record("ess_rtl_kwh", t, n, charge - charge_into_soc);
            report.record("ess_aux_kwh", t, n, aux_kwh);
        }
    }

    pub fn soc_kwh(&self) -> f64 {
        self.soc_kwh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ComponentLifecycle;

    fn config() -> EssConfig {
        EssConfig {
            lifecycle: ComponentLifecycle {
                incumbent: false,
                age_years: 0.0,
                lifetime_years: 10.0,
            },
            capacity_kwh: 10.0,
            charge_power_kw: 10.0,
            discharge_power_kw: 10.0,
            initial_charge_kwh: 0.0,
            mode: BatteryMode::Consume,
        }
    }

    #[test]
    fn null_battery_is_a_no_op() {
        let mut ess = Ess::null();
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 2.0;
        let stats = DayTariffStats::compute(&[0.2], 1);
        ess.step(0, 0.5, 0.2, &stats, &mut sum, None);
        assert_eq!(sum.elec_e[0], 2.0);
        assert_eq!(ess.soc_kwh(), 0.0);
    }

    #[test]
    fn surplus_charges_consume_mode_battery() {
        let mut ess = Ess::new(config());
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = -2.0;
        let stats = DayTariffStats::compute(&[0.2], 1);
        ess.step(0, 0.5, 0.2, &stats, &mut sum, None);
        assert!(ess.soc_kwh() > 0.0);
        assert!(sum.elec_e[0] > -2.0);
    }

    #[test]
    fn demand_discharges_consume_mode_battery() {
        let mut cfg = config();
        cfg.initial_charge_kwh = 5.0;
        let mut ess = Ess::new(cfg);
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 2.0;
        let stats = DayTariffStats::compute(&[0.2], 1);
        ess.step(0, 0.5, 0.2, &stats, &mut sum, None);
        assert_eq!(sum.elec_e[0], 0.0);
        assert!(ess.soc_kwh() < 5.0);
    }
}
