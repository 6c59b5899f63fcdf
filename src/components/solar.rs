//! Solar generation: one array/orientation drawn from a site yield series.

use crate::error::{EpochError, EpochResult};
use crate::site_data::SiteData;
use crate::sim::types::{ReportData, TempSum};
use crate::task::SolarPanelConfig;

#[derive(Debug, Clone)]
pub struct SolarPanel {
    config: SolarPanelConfig,
}

impl SolarPanel {
    pub fn new(config: SolarPanelConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, site: &SiteData) -> EpochResult<()> {
        if self.config.yield_index >= site.solar_yields.len() {
            return Err(EpochError::InvalidTaskData {
                field: "yield_index".to_string(),
                message: format!(
                    "index {} out of range (have {} yield series)",
                    self.config.yield_index,
                    site.solar_yields.len()
                ),
            });
        }
        Ok(())
    }

    /// Subtracts AC generation from `Elec_e[t]` (phase 2).
    pub fn step(&self, t: usize, site: &SiteData, sum: &mut TempSum, report: Option<&mut ReportData>) {
        let generation = site.solar_yields[self.config.yield_index][t] * self.config.yield_scalar;
        sum.elec_e[t] -= generation;

        if let Some(report) = report {
            report.record("pv_ac_kwh", t, sum.elec_e.len(), generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site_data::AshpTable;
    use crate::task::ComponentLifecycle;

    fn site_with_yield(values: Vec<f64>) -> SiteData {
        let n = values.len();
        SiteData {
            start_ts: 0,
            end_ts: (n as i64) * 1800,
            timestep_interval_s: 1800,
            building_eload: vec![1.0; n],
            building_hload: vec![0.0; n],
            ev_eload: vec![0.0; n],
            dhw_demand: vec![0.0; n],
            air_temperature: vec![10.0; n],
            grid_co2: vec![0.2; n],
            solar_yields: vec![values],
            import_tariffs: vec![vec![0.2; n]],
            fabric_interventions: vec![],
            ashp_input_table: AshpTable {
                air_temps_c: vec![0.0],
                send_temps_c: vec![45.0],
                values: vec![vec![1.0]],
            },
            ashp_output_table: AshpTable {
                air_temps_c: vec![0.0],
                send_temps_c: vec![45.0],
                values: vec![vec![3.0]],
            },
        }
    }

    #[test]
    fn generation_cancels_load_exactly() {
        let site = site_with_yield(vec![1.0; 24]);
        let panel = SolarPanel::new(SolarPanelConfig {
            lifecycle: ComponentLifecycle {
                incumbent: false,
                age_years: 0.0,
                lifetime_years: 25.0,
            },
            yield_index: 0,
            yield_scalar: 1.0,
            capacity_kwp: 1.0,
        });
        let mut sum = TempSum::new(24);
        for t in 0..24 {
            sum.elec_e[t] += site.building_eload[t];
            panel.step(t, &site, &mut sum, None);
        }
        assert!(sum.elec_e.iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn validate_rejects_out_of_range_yield_index() {
        let site = site_with_yield(vec![1.0; 4]);
        let panel = SolarPanel::new(SolarPanelConfig {
            lifecycle: ComponentLifecycle {
                incumbent: false,
                age_years: 0.0,
                lifetime_years: 25.0,
            },
            yield_index: 5,
            yield_scalar: 1.0,
            capacity_kwp: 1.0,
        });
        assert!(panel.validate(&site).is_err());
    }
}
