//! Grid connection: settles whatever `Elec_e[t]` remains after every other
//! component has acted (phase 6).

use crate::sim::types::{ReportData, TempSum};
use crate::task::GridConfig;

/// Outcome of settling one timestep against the grid connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettlement {
    pub import_kwh: f64,
    pub export_kwh: f64,
    pub import_shortfall_kwh: f64,
    pub curtailed_export_kwh: f64,
}

#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
}

impl Grid {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn tariff_index(&self) -> usize {
        self.config.tariff_index
    }

    pub fn export_tariff(&self) -> f64 {
        self.config.export_tariff
    }

    /// Clips the net demand remaining in `sum.elec_e[t]` to the grid's
    /// import/export limits. Positive residual demand draws import;
    /// negative draws export.
    pub fn step(
        &self,
        t: usize,
        interval_h: f64,
        sum: &TempSum,
        report: Option<&mut ReportData>,
    ) -> GridSettlement {
        let net = sum.elec_e[t];
        let import_cap = self.config.import_limit_kw * interval_h * (1.0 - self.config.import_headroom);
        let export_cap = self.config.export_limit_kw * interval_h;

        let settlement = if net >= 0.0 {
            GridSettlement {
                import_kwh: net.min(import_cap),
                export_kwh: 0.0,
                import_shortfall_kwh: (net - import_cap).max(0.0),
                curtailed_export_kwh: 0.0,
            }
        } else {
            let requested_export = -net;
            GridSettlement {
                import_kwh: 0.0,
                export_kwh: requested_export.min(export_cap),
                import_shortfall_kwh: 0.0,
                curtailed_export_kwh: (requested_export - export_cap).max(0.0),
            }
        };

        if let Some(report) = report {
            let n = sum.elec_e.len();
            report.record("grid_import_kwh", t, n, settlement.import_kwh);
            report.record("grid_export_kwh", t, n, settlement.export_kwh);
            report.record("grid_import_shortfall_kwh", t, n, settlement.import_shortfall_kwh);
            report.record("grid_curtailed_export_kwh", t, n, settlement.curtailed_export_kwh);
        }

        settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ComponentLifecycle;

    fn config() -> GridConfig {
        GridConfig {
            lifecycle: ComponentLifecycle {
                incumbent: true,
                age_years: 0.0,
                lifetime_years: 40.0,
            },
            import_limit_kw: 10.0,
            export_limit_kw: 10.0,
            import_headroom: 0.0,
            tariff_index: 0,
            export_tariff: 0.05,
        }
    }

    #[test]
    fn positive_net_demand_draws_import() {
        let grid = Grid::new(config());
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 2.0;
        let settlement = grid.step(0, 0.5, &sum, None);
        assert_eq!(settlement.import_kwh, 2.0);
        assert_eq!(settlement.export_kwh, 0.0);
        assert_eq!(settlement.import_shortfall_kwh, 0.0);
    }

    #[test]
    fn import_above_cap_is_a_shortfall() {
        let grid = Grid::new(config());
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = 100.0;
        let settlement = grid.step(0, 0.5, &sum, None); // cap = 10kW*0.5h = 5kWh
        assert_eq!(settlement.import_kwh, 5.0);
        assert_eq!(settlement.import_shortfall_kwh, 95.0);
    }

    #[test]
    fn negative_net_demand_draws_export() {
        let grid = Grid::new(config());
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = -3.0;
        let settlement = grid.step(0, 0.5, &sum, None);
        assert_eq!(settlement.export_kwh, 3.0);
        assert_eq!(settlement.curtailed_export_kwh, 0.0);
    }

    #[test]
    fn export_above_cap_is_curtailed() {
        let grid = Grid::new(config());
        let mut sum = TempSum::new(1);
        sum.elec_e[0] = -100.0;
        let settlement = grid.step(0, 0.5, &sum, None);
        assert_eq!(settlement.export_kwh, 5.0);
        assert_eq!(settlement.curtailed_export_kwh, 95.0);
    }
}
