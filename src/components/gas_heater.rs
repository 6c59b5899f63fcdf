//! Backup/boiler gas heater: covers whatever heat the heat pump left unmet.

use crate::constants::gas_heater as gas_const;
use crate::sim::types::{ReportData, TempSum};
use crate::task::GasHeaterConfig;

#[derive(Debug, Clone)]
pub struct GasHeater {
    config: GasHeaterConfig,
}

impl GasHeater {
    pub fn new(config: GasHeaterConfig) -> Self {
        Self { config }
    }

    /// Burns fuel to cover `heat_remaining`, up to its rated capacity.
    /// Returns the heat shortfall left unmet, which the caller accrues into
    /// `Heat_shortfall`.
    pub fn step(
        &self,
        t: usize,
        interval_h: f64,
        heat_remaining: f64,
        sum: &mut TempSum,
        report: Option<&mut ReportData>,
    ) -> f64 {
        let capacity_kwh = (self.config.rated_power_kw * interval_h).max(0.0);
        let heat_delivered = heat_remaining.min(capacity_kwh).max(0.0);
        let fuel_kwh = heat_delivered / gas_const::BOILER_EFFICIENCY;
        let shortfall = (heat_remaining - heat_delivered).max(0.0);

        if let Some(report) = report {
            let n = sum.elec_e.len();
            report.record("gas_heat_delivered_kwh", t, n, heat_delivered);
            report.record("gas_fuel_kwh", t, n, fuel_kwh);
            report.record("heat_shortfall_kwh", t, n, shortfall);
        }

        shortfall
    }

    pub fn gas_type(&self) -> crate::task::GasType {
        self.config.gas_type
    }
}
