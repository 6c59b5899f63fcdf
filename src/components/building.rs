//! Building baseline load and fabric-intervention selection.

use crate::error::EpochResult;
use crate::site_data::SiteData;
use crate::sim::types::{ReportData, TempSum};
use crate::task::BuildingConfig;

/// Always present; there is no "no building" scenario.
#[derive(Debug, Clone)]
pub struct Building {
    config: BuildingConfig,
}

impl Building {
    pub fn new(config: BuildingConfig) -> Self {
        Self { config }
    }

    /// Places the baseline electrical and heat demand into the accumulator
    /// (phase 1). The heat-load series is selected once per simulation by
    /// `fabric_intervention_index`, not recomputed per timestep.
    pub fn step(
        &self,
        t: usize,
        hload: &[f64],
        site: &SiteData,
        sum: &mut TempSum,
        report: Option<&mut ReportData>,
    ) {
        let eload = site.building_eload[t] * self.config.eload_scalar;
        let hload = hload[t] * self.config.hload_scalar;

        sum.elec_e[t] += eload;
        sum.heat_h[t] += hload;
        sum.ch_load_h[t] += hload;

        if let Some(report) = report {
            report.record("building_eload_kwh", t, sum.elec_e.len(), eload);
            report.record("building_hload_kwh", t, sum.elec_e.len(), hload);
        }
    }

    /// Resolves the heat-load series this scenario selected, validating the
    /// intervention index against `site`.
    pub fn hload_series<'a>(&self, site: &'a SiteData) -> EpochResult<&'a [f64]> {
        site.hload_for_intervention(self.config.fabric_intervention_index)
    }
}
