//! Domestic hot-water cylinder: a lumped thermal model.

use crate::constants::dhw as dhw_const;
use crate::sim::tariff_stats::DayTariffStats;
use crate::sim::types::{ReportData, TempSum};
use crate::task::DhwConfig;

/// A cylinder holding `soc_kwh` of stored thermal energy, `0..=capacity_kwh`.
#[derive(Debug, Clone)]
pub struct Dhw {
    config: DhwConfig,
    capacity_kwh: f64,
    soc_kwh: f64,
}

impl Dhw {
    pub fn new(config: DhwConfig) -> Self {
        let capacity_kwh = cylinder_capacity_kwh(config.volume_litres);
        let soc_kwh = config.initial_soc_kwh.clamp(0.0, capacity_kwh);
        Self {
            config,
            capacity_kwh,
            soc_kwh,
        }
    }

    /// Services DHW demand and standby loss, opportunistically charging from
    /// surplus generation and, when the tariff is cheap, from a top-up
    /// source. Mutates `sum.elec_e[t]` for any electrical draw and
    /// `sum.dhw_load_h[t]` for the discharge served.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        t: usize,
        interval_h: f64,
        demand_kwh: f64,
        tariff_t: f64,
        tariff_stats: &DayTariffStats,
        sum: &mut TempSum,
        report: Option<&mut ReportData>,
    ) -> f64 {
        let u_w_per_c = dhw_const::standby_loss_coefficient_w_per_c(self.config.volume_litres);
        let t_avg = (self.soc_kwh * 3600.0)
            / (dhw_const::RHO_KG_PER_L * self.config.volume_litres * dhw_const::C_W_KJ_PER_KG_C)
            + dhw_const::T_COLD_C;
        let standby_loss_kwh = u_w_per_c * (t_avg - dhw_const::T_AMBIENT_C) * interval_h / 1000.0;

        let mut electrical_draw = 0.0;

        let surplus = (-sum.elec_e[t]).max(0.0);
        let remaining = (self.capacity_kwh - self.soc_kwh).max(0.0);
        let immersion_charge = surplus.min(remaining);
        self.soc_kwh += immersion_charge;
        electrical_draw += immersion_charge;

        if tariff_stats.is_cheap(tariff_t, t) {
            let remaining_after_immersion = (self.capacity_kwh - self.soc_kwh).max(0.0);
            let topup_max = self.config.topup_power_kw * interval_h;
            let topup_charge = topup_max.min(remaining_after_immersion);
            self.soc_kwh += topup_charge;
            electrical_draw += topup_charge;
        }

        self.soc_kwh -= standby_loss_kwh;
        self.soc_kwh -= demand_kwh;

        let mut shortfall = 0.0;
        if self.soc_kwh < 0.0 {
            shortfall = -self.soc_kwh;
            self.soc_kwh = 0.0;
            electrical_draw += shortfall;
        }
        self.soc_kwh = self.soc_kwh.min(self.capacity_kwh);

        sum.elec_e[t] += immersion_charge;
        sum.dhw_load_h[t] += demand_kwh;
        if electrical_draw > immersion_charge {
            sum.elec_e[t] += electrical_draw - immersion_charge;
        }

        if let Some(report) = report {
            let n = sum.elec_e.len();
            report.record("dhw_soc_kwh", t, n, self.soc_kwh);
            report.record("dhw_standby_loss_kwh", t, n, standby_loss_kwh);
            report.record("dhw_shortfall_kwh", t, n, shortfall);
        }

        shortfall
    }

    pub fn soc_kwh(&self) -> f64 {
        self.soc_kwh
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }
}

/// Maximum thermal energy storable between `T_cold` and `T_set`, kWh.
fn cylinder_capacity_kwh(volume_litres: f64) -> f64 {
    dhw_const::RHO_KG_PER_L
        * volume_litres
        * dhw_const::C_W_KJ_PER_KG_C
        * (dhw_const::T_SET_C - dhw_const::T_COLD_C)
        / 3600.0
}
