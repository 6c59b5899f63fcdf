//! Air-source heat pump: services heat demand from the ASHP lookup tables.

use crate::error::{EpochError, EpochResult};
use crate::site_data::SiteData;
use crate::sim::types::{ReportData, TempSum};
use crate::task::HeatPumpConfig;

#[derive(Debug, Clone)]
pub struct HeatPump {
    config: HeatPumpConfig,
}

impl HeatPump {
    pub fn new(config: HeatPumpConfig) -> Self {
        Self { config }
    }

    /// Validates that `send_temp_c` is a column of both ASHP lookup tables.
    pub fn validate(&self, site: &SiteData) -> EpochResult<()> {
        let send_temp_c = self.config.send_temp_c;
        if !site.ashp_output_table.has_send_temp(send_temp_c) || !site.ashp_input_table.has_send_temp(send_temp_c) {
            return Err(EpochError::InvalidTaskData {
                field: "send_temp_c".to_string(),
                message: format!("{send_temp_c} is not a column of the ASHP lookup tables"),
            });
        }
        Ok(())
    }

    /// Services as much of `heat_remaining` as the pump can deliver this
    /// timestep (phase 3), returning `(heat_delivered_kwh, heat_remaining_after)`.
    pub fn step(
        &self,
        t: usize,
        interval_h: f64,
        heat_remaining: f64,
        site: &SiteData,
        sum: &mut TempSum,
        report: Option<&mut ReportData>,
    ) -> EpochResult<f64> {
        let air_temp = site.air_temperature[t];
        let output_kw = site.ashp_output_table.lookup(air_temp, self.config.send_temp_c)?;
        let input_kw = site.ashp_input_table.lookup(air_temp, self.config.send_temp_c)?;

        let output_capacity_kwh = (output_kw * interval_h).max(0.0);
        let heat_delivered = heat_remaining.min(output_capacity_kwh).max(0.0);

        let fraction = if output_capacity_kwh > 0.0 {
            heat_delivered / output_capacity_kwh
        } else {
            0.0
        };
        let electrical_draw = input_kw * interval_h * fraction;

        sum.elec_e[t] += electrical_draw;

        if let Some(report) = report {
            let n = sum.elec_e.len();
            report.record("ashp_heat_delivered_kwh", t, n, heat_delivered);
            report.record("ashp_elec_draw_kwh", t, n, electrical_draw);
        }

        Ok(heat_remaining - heat_delivered)
    }
}
