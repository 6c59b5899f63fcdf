//! Immutable per-site inputs.
//!
//! `SiteData` is loaded once by the caller and shared read-only by every
//! worker thread in the search engine.

use serde::{Deserialize, Serialize};

use crate::error::{EpochError, EpochResult};

/// A single fabric-intervention variant: an alternative heat-load series
/// representing a building-fabric upgrade (insulation, glazing, etc.).
///
/// Index 0 in `SiteData::fabric_interventions` corresponds to parameter
/// index 1 in `TaskData` (index 0 on the task means "no intervention" and
/// selects `SiteData::building_hload` directly) — see the Open Questions in
/// DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FabricIntervention {
    /// Fixed CAPEX of the intervention (not piecewise).
    pub cost: f64,
    /// Replacement heat-load series, length `timesteps`.
    pub reduced_hload: Vec<f64>,
}

/// Rectangular air-source heat-pump lookup table: rows indexed by air
/// temperature, columns by the heat pump's send (flow) temperature.
///
/// `air_temps_c` and `send_temps_c` are the row/column axis labels,
/// strictly increasing, with `values[row][col]` giving the table entry for
/// `(air_temps_c[row], send_temps_c[col])`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AshpTable {
    pub air_temps_c: Vec<f64>,
    pub send_temps_c: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl AshpTable {
    fn validate(&self, name: &str) -> EpochResult<()> {
        if self.air_temps_c.is_empty() || self.send_temps_c.is_empty() {
            return Err(EpochError::InvalidSiteData {
                field: name.to_string(),
                message: "table axes must be non-empty".to_string(),
            });
        }
        if self.values.len() != self.air_temps_c.len() {
            return Err(EpochError::InvalidSiteData {
                field: name.to_string(),
                message: format!(
                    "expected {} rows, found {}",
                    self.air_temps_c.len(),
                    self.values.len()
                ),
            });
        }
        for (i, row) in self.values.iter().enumerate() {
            if row.len() != self.send_temps_c.len() {
                return Err(EpochError::InvalidSiteData {
                    field: name.to_string(),
                    message: format!(
                        "row {i} has {} columns, expected {}",
                        row.len(),
                        self.send_temps_c.len()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Whether `send_temp_c` matches one of the table's labelled columns.
    pub fn has_send_temp(&self, send_temp_c: f64) -> bool {
        self.send_temps_c.iter().any(|&t| (t - send_temp_c).abs() < 1e-9)
    }

    /// Looks up the table value at the given air temperature (nearest row)
    /// and send temperature (exact column match required).
    ///
    /// Air temperature is a continuous per-timestep reading, so the nearest
    /// tabulated row is used. Send temperature is a fixed design choice for
    /// the heat pump, so it must land exactly on one of the table's labelled
    /// columns ("HP `send_temp` is representable in the lookup").
    pub fn lookup(&self, air_temp_c: f64, send_temp_c: f64) -> EpochResult<f64> {
        let col = self
            .send_temps_c
            .iter()
            .position(|&t| (t - send_temp_c).abs() < 1e-9)
            .ok_or_else(|| EpochError::InvalidTaskData {
                field: "send_temp_c".to_string(),
                message: format!("{send_temp_c} is not a column of the ASHP lookup table"),
            })?;

        let row = nearest_index(&self.air_temps_c, air_temp_c);
        Ok(self.values[row][col])
    }
}

fn nearest_index(sorted: &[f64], value: f64) -> usize {
    match sorted.binary_search_by(|probe| probe.partial_cmp(&value).unwrap()) {
        Ok(i) => i,
        Err(0) => 0,
        Err(i) if i >= sorted.len() => sorted.len() - 1,
        Err(i) => {
            let below = i - 1;
            if (sorted[i] - value).abs() < (value - sorted[below]).abs() {
                i
            } else {
                below
            }
        }
    }
}

/// Immutable per-site inputs, fixed for the whole simulated year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteData {
    /// Wall-clock start of the simulated year, Unix seconds.
    pub start_ts: i64,
    /// Wall-clock end of the simulated year, Unix seconds.
    pub end_ts: i64,
    /// Duration of one timestep, seconds (equal for all steps).
    pub timestep_interval_s: i64,

    /// Baseline building electrical load, kWh per timestep.
    pub building_eload: Vec<f64>,
    /// Baseline building heat load, kWh per timestep.
    pub building_hload: Vec<f64>,
    /// EV charging load, kWh per timestep.
    pub ev_eload: Vec<f64>,
    /// Domestic hot-water draw, kWh per timestep.
    pub dhw_demand: Vec<f64>,
    /// Outside air temperature, °C per timestep.
    pub air_temperature: Vec<f64>,
    /// Grid carbon intensity, kg CO2e/kWh per timestep.
    pub grid_co2: Vec<f64>,

    /// Ordered solar yield series, one per site orientation, kWh/kWp per timestep.
    pub solar_yields: Vec<Vec<f64>>,
    /// Ordered import tariff series, £/kWh per timestep.
    pub import_tariffs: Vec<Vec<f64>>,
    /// Ordered fabric-intervention variants.
    pub fabric_interventions: Vec<FabricIntervention>,

    /// Air-source heat pump electrical input table, kW.
    pub ashp_input_table: AshpTable,
    /// Air-source heat pump heat output table, kW.
    pub ashp_output_table: AshpTable,
}

impl SiteData {
    /// Number of simulated timesteps, derived from the wall-clock bounds and interval.
    pub fn timesteps(&self) -> usize {
        if self.timestep_interval_s <= 0 {
            return 0;
        }
        ((self.end_ts - self.start_ts) / self.timestep_interval_s).max(0) as usize
    }

    /// Timestep duration in hours.
    pub fn interval_hours(&self) -> f64 {
        self.timestep_interval_s as f64 / 3600.0
    }

    /// Validates structural invariants: positive interval, consistent
    /// timestep count, matching series lengths, well-formed lookup tables.
    ///
    /// This does not validate anything `TaskData`-specific (tariff/yield/
    /// fabric index bounds) — that happens per-scenario in
    /// `Simulator::validate_task`, since it depends on the scenario, not the
    /// site.
    pub fn validate(&self) -> EpochResult<()> {
        if self.timestep_interval_s <= 0 {
            return Err(EpochError::InvalidSiteData {
                field: "timestep_interval_s".to_string(),
                message: "must be > 0".to_string(),
            });
        }
        if self.end_ts <= self.start_ts {
            return Err(EpochError::InvalidSiteData {
                field: "end_ts".to_string(),
                message: "must be > start_ts".to_string(),
            });
        }

        let n = self.timesteps();
        let series: [(&str, &[f64]); 6] = [
            ("building_eload", &self.building_eload),
            ("building_hload", &self.building_hload),
            ("ev_eload", &self.ev_eload),
            ("dhw_demand", &self.dhw_demand),
            ("air_temperature", &self.air_temperature),
            ("grid_co2", &self.grid_co2),
        ];
        for (name, s) in series {
            if s.len() != n {
                return Err(EpochError::InvalidSiteData {
                    field: name.to_string(),
                    message: format!("expected length {n}, found {}", s.len()),
                });
            }
        }

        for (i, s) in self.solar_yields.iter().enumerate() {
            if s.len() != n {
                return Err(EpochError::InvalidSiteData {
                    field: format!("solar_yields[{i}]"),
                    message: format!("expected length {n}, found {}", s.len()),
                });
            }
        }
        for (i, s) in self.import_tariffs.iter().enumerate() {
            if s.len() != n {
                return Err(EpochError::InvalidSiteData {
                    field: format!("import_tariffs[{i}]"),
                    message: format!("expected length {n}, found {}", s.len()),
                });
            }
        }
        for (i, fi) in self.fabric_interventions.iter().enumerate() {
            if fi.reduced_hload.len() != n {
                return Err(EpochError::InvalidSiteData {
                    field: format!("fabric_interventions[{i}].reduced_hload"),
                    message: format!("expected length {n}, found {}", fi.reduced_hload.len()),
                });
            }
        }

        self.ashp_input_table.validate("ashp_input_table")?;
        self.ashp_output_table.validate("ashp_output_table")?;

        Ok(())
    }

    /// Returns the heat-load series selected by a fabric-intervention index.
    ///
    /// Index 0 selects `building_hload` directly; index `k > 0` selects
    /// `fabric_interventions[k - 1].reduced_hload` (1-based, preserved for
    /// JSON compatibility with upstream data).
    pub fn hload_for_intervention(&self, index: usize) -> EpochResult<&[f64]> {
        if index == 0 {
            return Ok(&self.building_hload);
        }
        self.fabric_interventions
            .get(index - 1)
            .map(|fi| fi.reduced_hload.as_slice())
            .ok_or_else(|| EpochError::InvalidTaskData {
                field: "fabric_intervention_index".to_string(),
                message: format!(
                    "index {index} out of range (have {} interventions)",
                    self.fabric_interventions.len()
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_site(n: usize) -> SiteData {
        SiteData {
            start_ts: 0,
            end_ts: (n as i64) * 1800,
            timestep_interval_s: 1800,
            building_eload: vec![1.0; n],
            building_hload: vec![2.0; n],
            ev_eload: vec![0.0; n],
            dhw_demand: vec![0.0; n],
            air_temperature: vec![10.0; n],
            grid_co2: vec![0.2; n],
            solar_yields: vec![vec![0.0; n]],
            import_tariffs: vec![vec![0.2; n]],
            fabric_interventions: vec![],
            ashp_input_table: AshpTable {
                air_temps_c: vec![-5.0, 0.0, 10.0, 20.0],
                send_temps_c: vec![35.0, 45.0, 55.0],
                values: vec![vec![1.0; 3]; 4],
            },
            ashp_output_table: AshpTable {
                air_temps_c: vec![-5.0, 0.0, 10.0, 20.0],
                send_temps_c: vec![35.0, 45.0, 55.0],
                values: vec![vec![3.0; 3]; 4],
            },
        }
    }

    #[test]
    fn timesteps_derived_from_bounds() {
        let site = flat_site(24);
        assert_eq!(site.timesteps(), 24);
    }

    #[test]
    fn validate_accepts_well_formed_site() {
        assert!(flat_site(24).validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_length() {
        let mut site = flat_site(24);
        site.grid_co2.pop();
        assert!(site.validate().is_err());
    }

    #[test]
    fn hload_index_zero_is_baseline() {
        let site = flat_site(4);
        assert_eq!(site.hload_for_intervention(0).unwrap(), &[2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn hload_index_out_of_range_errors() {
        let site = flat_site(4);
        assert!(site.hload_for_intervention(1).is_err());
    }

    #[test]
    fn ashp_lookup_requires_exact_send_temp() {
        let site = flat_site(4);
        assert!(site.ashp_input_table.lookup(0.0, 45.0).is_ok());
        assert!(site.ashp_input_table.lookup(0.0, 46.0).is_err());
    }

    #[test]
    fn ashp_lookup_snaps_to_nearest_air_temp() {
        let site = flat_site(4);
        // 8.0 is closer to 10.0 than to 0.0
        let v = site.ashp_output_table.lookup(8.0, 35.0).unwrap();
        assert_eq!(v, 3.0);
    }
}
