//! The per-scenario half-hourly balancing loop.

use crate::components::{
    building::Building, data_centre::DataCentre, dhw::Dhw, ess::Ess, ev_charger::EvCharger,
    gas_heater::GasHeater, grid::Grid, heat_pump::HeatPump, mop::Mop, solar::SolarPanel,
};
use crate::constants::carbon;
use crate::error::{EpochError, EpochResult};
use crate::site_data::SiteData;
use crate::sim::future_energy::FutureEnergyEstimate;
use crate::sim::result::{SimulationResult, SimulationTotals};
use crate::sim::tariff_stats::DayTariffStats;
use crate::sim::types::{ReportData, SimulationMode, TempSum};
use crate::task::{GasType, TaskData};

/// Drives one scenario end-to-end. Holds only a shared reference to
/// `SiteData`: it never mutates its input, so the same `Simulator` can be
/// reused (and shared read-only) across every worker thread.
pub struct Simulator<'a> {
    site: &'a SiteData,
}

impl<'a> Simulator<'a> {
    pub fn new(site: &'a SiteData) -> Self {
        Self { site }
    }

    /// Checks that every index `task` references into `self.site` is in
    /// range and that the heat pump's send temperature (if any) is
    /// representable in the ASHP lookup tables.
    pub fn validate_task(&self, task: &TaskData) -> EpochResult<()> {
        self.site
            .hload_for_intervention(task.building.fabric_intervention_index)
            .map(|_| ())?;

        if task.grid.tariff_index >= self.site.import_tariffs.len() {
            return Err(EpochError::InvalidTaskData {
                field: "tariff_index".to_string(),
                message: format!(
                    "index {} out of range (have {} tariff series)",
                    task.grid.tariff_index,
                    self.site.import_tariffs.len()
                ),
            });
        }

        for panel in &task.solar {
            SolarPanel::new(*panel).validate(self.site)?;
        }

        if let Some(hp) = task.heat_pump {
            HeatPump::new(hp).validate(self.site)?;
        }

        if task.config.use_boiler_upgrade_scheme && task.heat_pump.is_some() && task.gas_heater.is_none() {
            return Err(EpochError::InvalidTaskData {
                field: "gas_heater".to_string(),
                message: "boiler upgrade scheme requires a gas heater for the heat pump to replace"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Runs the full half-hourly loop and returns the scenario's totals.
    /// Deterministic: timesteps are processed strictly in order and the
    /// component dispatch order within a timestep never varies.
    pub fn simulate(&self, task: &TaskData, mode: SimulationMode) -> EpochResult<SimulationResult> {
        self.validate_task(task)?;

        let timesteps = self.site.timesteps();
        let interval_h = self.site.interval_hours();
        let steps_per_day = ((24.0 * 3600.0) / self.site.timestep_interval_s as f64).round() as usize;

        let hload = self
            .site
            .hload_for_intervention(task.building.fabric_intervention_index)?
            .to_vec();
        let tariff = &self.site.import_tariffs[task.grid.tariff_index];
        let tariff_stats = DayTariffStats::compute(tariff, steps_per_day.max(1));
        let future_energy = FutureEnergyEstimate::compute(&self.site.building_eload, steps_per_day.max(1));

        let building = Building::new(task.building);
        let mut dhw = task.dhw.map(Dhw::new);
        let mut ess = task.ess.map(Ess::new).unwrap_or_else(Ess::null);
        let heat_pump = task.heat_pump.map(HeatPump::new);
        let gas_heater = task.gas_heater.map(GasHeater::new);
        let solar: Vec<SolarPanel> = task.solar.iter().copied().map(SolarPanel::new).collect();
        let ev_charger = task.ev_charger.map(EvCharger::new).unwrap_or_else(EvCharger::null);
        let data_centre = task.data_centre.map(DataCentre::new);
        let grid = Grid::new(task.grid);
        let mop = task.mop.map(Mop::new);

        let mut sum = TempSum::new(timesteps);
        let mut report = if mode.reports() { Some(ReportData::new()) } else { None };
        let mut totals = SimulationTotals::default();
        if let Some(heater) = &gas_heater {
            totals.gas_type = Some(heater.gas_type());
        }

        for t in 0..timesteps {
            // Phase 1: building / DHW demand placement.
            building.step(t, &hload, self.site, &mut sum, report.as_mut());
            if let Some(dhw) = dhw.as_mut() {
                let shortfall = dhw.step(
                    t,
                    interval_h,
                    self.site.dhw_demand[t],
                    tariff[t],
                    &tariff_stats,
                    &mut sum,
                    report.as_mut(),
                );
                totals.dhw_shortfall_kwh += shortfall;
            }

            // Phase 2: generation injection.
            for panel in &solar {
                panel.step(t, self.site, &mut sum, report.as_mut());
            }

            // Phase 1b: MOP, a fixed low-priority load bundled with the
            // building demand placement.
            if let Some(mop) = &mop {
                mop.step(t, interval_h, &mut sum, report.as_mut());
            }

            // Phase 3: heat production — heat pump first, gas heater covers the rest.
            let mut heat_remaining = sum.heat_h[t];
            if let Some(hp) = &heat_pump {
                heat_remaining = hp.step(t, interval_h, heat_remaining, self.site, &mut sum, report.as_mut())?;
            }
            if let Some(heater) = &gas_heater {
                let shortfall = heater.step(t, interval_h, heat_remaining, &mut sum, report.as_mut());
                totals.heat_shortfall_kwh += shortfall;
                totals.gas_fuel_kwh += (heat_remaining - shortfall) / crate::constants::gas_heater::BOILER_EFFICIENCY;
            } else {
                totals.heat_shortfall_kwh += heat_remaining;
            }

            // Phase 4: flexible loads — data centre, then EV charging. Both
            // compare the timestep's demand so far against the forward
            // estimate and throttle back when it's already running hot.
            let future_energy_kwh = future_energy.at(t);
            if let Some(dc) = &data_centre {
                dc.step(t, interval_h, future_energy_kwh, &mut sum, report.as_mut());
            }
            ev_charger.step(
                t,
                interval_h,
                self.site.ev_eload[t],
                future_energy_kwh,
                &mut sum,
                report.as_mut(),
            );

            // Phase 5: ESS dispatch.
            ess.step(t, interval_h, tariff[t], &tariff_stats, &mut sum, report.as_mut());

            // Phase 6: grid settlement.
            let settlement = grid.step(t, interval_h, &sum, report.as_mut());
            totals.grid_import_kwh += settlement.import_kwh;
            totals.grid_export_kwh += settlement.export_kwh;
            totals.import_shortfall_kwh += settlement.import_shortfall_kwh;
            totals.curtailed_export_kwh += settlement.curtailed_export_kwh;
            totals.meter_cost += settlement.import_kwh * tariff[t];
            totals.meter_revenue += settlement.export_kwh * grid.export_tariff();
            totals.scope_2_carbon_kg +=
                settlement.import_kwh * self.site.grid_co2[t] - settlement.export_kwh * self.site.grid_co2[t];
        }

        for value in [
            totals.grid_import_kwh,
            totals.grid_export_kwh,
            totals.meter_cost,
            totals.scope_2_carbon_kg,
        ] {
            if !value.is_finite() {
                return Err(EpochError::NumericFailure {
                    metric: "simulation_totals".to_string(),
                    value,
                });
            }
        }

        Ok(SimulationResult { totals, report_data: report })
    }
}

/// Scope-1 carbon emission factor for a given gas type.
pub fn scope_1_emission_factor(gas_type: GasType) -> f64 {
    match gas_type {
        GasType::NaturalGas => carbon::NATURAL_GAS_KG_PER_KWH,
        GasType::LiquidPetroleumGas => carbon::LPG_KG_PER_KWH,
    }
}
