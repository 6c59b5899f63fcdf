//! Raw per-scenario simulation output, before cost/carbon roll-up.

use crate::sim::types::ReportData;
use crate::task::GasType;

/// Scenario-wide totals accumulated across every timestep of one
/// simulation. These are the inputs to the cost/carbon roll-up in
/// `metrics.rs`; nothing here is itself a cost or carbon figure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationTotals {
    pub grid_import_kwh: f64,
    pub grid_export_kwh: f64,
    pub import_shortfall_kwh: f64,
    pub curtailed_export_kwh: f64,
    pub gas_fuel_kwh: f64,
    pub gas_type: Option<GasType>,
    pub heat_shortfall_kwh: f64,
    pub dhw_shortfall_kwh: f64,
    pub meter_cost: f64,
    pub meter_revenue: f64,
    /// Σ `grid_import[t] · grid_co2[t]` − Σ `grid_export[t] · grid_co2[t]`,
    /// accumulated per timestep since the carbon intensity varies by t.
    pub scope_2_carbon_kg: f64,
}

/// The outcome of one `Simulator::simulate` call.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub totals: SimulationTotals,
    pub report_data: Option<ReportData>,
}
