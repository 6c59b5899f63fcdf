//! Per-simulation mutable state: the energy-balance accumulator and the
//! optional per-timestep report series.

use std::collections::BTreeMap;

/// Reporting granularity requested of the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationMode {
    /// Compute scalar metrics only; skip all per-timestep series.
    ResultOnly,
    /// Compute scalar metrics and populate `ReportData`.
    FullReporting,
}

impl SimulationMode {
    pub fn reports(self) -> bool {
        matches!(self, SimulationMode::FullReporting)
    }
}

/// The per-timestep energy-balance accumulator threaded through the six
/// balancing phases. Sign convention: positive = net demand, negative = net
/// surplus.
#[derive(Debug, Clone)]
pub struct TempSum {
    /// Net electrical demand, kWh.
    pub elec_e: Vec<f64>,
    /// Net heat demand, kWh.
    pub heat_h: Vec<f64>,
    /// Space-heating (central heating) load component, kWh.
    pub ch_load_h: Vec<f64>,
    /// DHW load component, kWh.
    pub dhw_load_h: Vec<f64>,
}

impl TempSum {
    pub fn new(timesteps: usize) -> Self {
        Self {
            elec_e: vec![0.0; timesteps],
            heat_h: vec![0.0; timesteps],
            ch_load_h: vec![0.0; timesteps],
            dhw_load_h: vec![0.0; timesteps],
        }
    }
}

/// Per-timestep series produced under `SimulationMode::FullReporting`.
///
/// Represented as a name → series map rather than a struct of fixed vectors,
/// so a component that is absent from the scenario simply contributes no
/// entries instead of a column of zeros. Consumers should not assume any
/// particular key is present.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    series: BTreeMap<String, Vec<f64>>,
}

impl ReportData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one timestep's value for the named series, allocating the
    /// series (pre-filled with zeros for earlier timesteps) on first use.
    pub fn record(&mut self, name: &str, timestep: usize, total_timesteps: usize, value: f64) {
        let series = self
            .series
            .entry(name.to_string())
            .or_insert_with(|| vec![0.0; total_timesteps]);
        series[timestep] = value;
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_sum_starts_at_zero() {
        let sum = TempSum::new(4);
        assert_eq!(sum.elec_e, vec![0.0; 4]);
    }

    #[test]
    fn report_data_absent_component_contributes_nothing() {
        let report = ReportData::new();
        assert!(report.is_empty());
        assert!(report.series("pv_ac_kwh").is_none());
    }

    #[test]
    fn report_data_records_named_series() {
        let mut report = ReportData::new();
        report.record("pv_ac_kwh", 1, 3, 5.0);
        assert_eq!(report.series("pv_ac_kwh").unwrap(), &[0.0, 5.0, 0.0]);
    }
}
