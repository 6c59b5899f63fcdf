//! MOP: miscellaneous low-priority, non-shiftable load.

use crate::sim::types::{ReportData, TempSum};
use crate::task::MopConfig;

#[derive(Debug, Clone)]
pub struct Mop {
    config: MopConfig,
}

impl Mop {
    pub fn new(config: MopConfig) -> Self {
        Self { config }
    }

    /// Adds its fixed draw alongside the building load (phase 1).
    pub fn step(&self, t: usize, interval_h: f64, sum: &mut TempSum, report: Option<&mut ReportData>) {
        let delivered = self.config.rated_power_kw * interval_h;
        sum.elec_e[t] += delivered;

        if let Some(report) = report {
            report.record("mop_kwh", t, sum.elec_e.len(), delivered);
        }
    }
}
