//! Per-scenario component choices (`TaskData`) and run-wide configuration
//! (`TaskConfig`).
//!
//! `TaskData` is a sum of optional component records. Each present
//! component carries `{incumbent, age_years, lifetime_years}` common fields
//! plus its own sizing attributes, following the tagged-variant /
//! `Option`-slot design: the balancing loop treats an absent slot as "skip
//! dispatch; zero contribution" rather than reaching for a null object.

use serde::{Deserialize, Serialize};

/// Shared bookkeeping carried by every optional component.
///
/// `incumbent` marks a component as pre-existing: its CAPEX is excluded from
/// the scenario's capital cost, but replacement scheduling in the NPV
/// roll-up still applies using `age_years`/`lifetime_years`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentLifecycle {
    pub incumbent: bool,
    pub age_years: f64,
    pub lifetime_years: f64,
}

/// Battery dispatch strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatteryMode {
    Consume,
    ConsumePlus,
}

/// Gas combusted by the backup/boiler heater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GasType {
    NaturalGas,
    LiquidPetroleumGas,
}

/// Heat pump source configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatSource {
    AmbientAir,
    Hotroom,
}

/// Building-fabric intervention choice: `0` keeps `SiteData::building_hload`,
/// `k > 0` selects `SiteData::fabric_interventions[k - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub fabric_intervention_index: usize,
    pub eload_scalar: f64,
    pub hload_scalar: f64,
}

/// Domestic hot-water cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DhwConfig {
    pub lifecycle: ComponentLifecycle,
    /// Cylinder volume, litres.
    pub volume_litres: f64,
    pub initial_soc_kwh: f64,
    /// Electrical power rating available for the cheap-tariff top-up charge,
    /// independent of whatever heat pump is present on this scenario.
    pub topup_power_kw: f64,
}

/// Battery energy storage system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EssConfig {
    pub lifecycle: ComponentLifecycle,
    pub capacity_kwh: f64,
    pub charge_power_kw: f64,
    pub discharge_power_kw: f64,
    pub initial_charge_kwh: f64,
    pub mode: BatteryMode,
}

/// Air-source heat pump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpConfig {
    pub lifecycle: ComponentLifecycle,
    pub source: HeatSource,
    /// Flow (send) temperature, must match a column of the ASHP tables, °C.
    pub send_temp_c: f64,
    /// Nameplate capacity used as the CAPEX/OPEX sizing quantity; the actual
    /// per-timestep output is whatever the ASHP lookup tables give at the
    /// prevailing air temperature.
    pub rated_capacity_kw: f64,
}

/// Backup/boiler gas heater.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasHeaterConfig {
    pub lifecycle: ComponentLifecycle,
    pub gas_type: GasType,
    pub rated_power_kw: f64,
}

/// A single solar orientation/array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPanelConfig {
    pub lifecycle: ComponentLifecycle,
    /// Index into `SiteData::solar_yields`.
    pub yield_index: usize,
    pub yield_scalar: f64,
    pub capacity_kwp: f64,
}

/// EV charger bank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvChargerConfig {
    pub lifecycle: ComponentLifecycle,
    pub charger_count: usize,
    pub rated_power_kw: f64,
}

/// On-site data centre: a flexible, schedulable electrical load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataCentreConfig {
    pub lifecycle: ComponentLifecycle,
    pub rated_power_kw: f64,
}

/// Grid connection limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub lifecycle: ComponentLifecycle,
    pub import_limit_kw: f64,
    pub export_limit_kw: f64,
    /// Fraction of `import_limit_kw` held back as headroom (0..1).
    pub import_headroom: f64,
    /// Index into `SiteData::import_tariffs`.
    pub tariff_index: usize,
    pub export_tariff: f64,
}

/// Miscellaneous other (low-priority, non-shiftable) load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MopConfig {
    pub lifecycle: ComponentLifecycle,
    pub rated_power_kw: f64,
}

/// Piecewise CAPEX/OPEX model selector stored per family; the actual rate
/// tables live in `CostModel` (see `cost.rs`). `TaskConfig` only carries the
/// scalar knobs that are not piecewise: funding flags and the NPV horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub capex_limit: f64,
    pub use_boiler_upgrade_scheme: bool,
    pub general_grant_funding: f64,
    pub npv_time_horizon: u32,
    pub npv_discount_factor: f64,
}

/// A fully specified scenario: which optional components exist, and the
/// run-wide configuration that applies to all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskData {
    pub building: BuildingConfig,
    pub dhw: Option<DhwConfig>,
    pub ess: Option<EssConfig>,
    pub heat_pump: Option<HeatPumpConfig>,
    pub gas_heater: Option<GasHeaterConfig>,
    pub solar: Vec<SolarPanelConfig>,
    pub ev_charger: Option<EvChargerConfig>,
    pub data_centre: Option<DataCentreConfig>,
    pub grid: GridConfig,
    pub mop: Option<MopConfig>,
    pub config: TaskConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> TaskData {
        TaskData {
            building: BuildingConfig {
                fabric_intervention_index: 0,
                eload_scalar: 1.0,
                hload_scalar: 1.0,
            },
            dhw: None,
            ess: Some(EssConfig {
                lifecycle: ComponentLifecycle {
                    incumbent: false,
                    age_years: 0.0,
                    lifetime_years: 10.0,
                },
                capacity_kwh: 10.0,
                charge_power_kw: 5.0,
                discharge_power_kw: 5.0,
                initial_charge_kwh: 0.0,
                mode: BatteryMode::Consume,
            }),
            heat_pump: None,
            gas_heater: None,
            solar: vec![],
            ev_charger: None,
            data_centre: None,
            grid: GridConfig {
                lifecycle: ComponentLifecycle {
                    incumbent: true,
                    age_years: 0.0,
                    lifetime_years: 40.0,
                },
                import_limit_kw: 1000.0,
                export_limit_kw: 1000.0,
                import_headroom: 0.0,
                tariff_index: 0,
                export_tariff: 0.05,
            },
            mop: None,
            config: TaskConfig {
                capex_limit: 100_000.0,
                use_boiler_upgrade_scheme: false,
                general_grant_funding: 0.0,
                npv_time_horizon: 20,
                npv_discount_factor: 0.035,
            },
        }
    }

    #[test]
    fn json_round_trip_is_identity() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        let back: TaskData = serde_json::from_str(&json).unwrap();
        assert_eq!(task, back);
    }

    #[test]
    fn absent_component_serializes_as_null() {
        let task = sample_task();
        let json = serde_json::to_value(&task).unwrap();
        assert!(json["dhw"].is_null());
        assert!(json["heat_pump"].is_null());
    }

    #[test]
    fn battery_mode_uses_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&BatteryMode::ConsumePlus).unwrap(),
            "\"CONSUME_PLUS\""
        );
        assert_eq!(
            serde_json::to_string(&GasType::LiquidPetroleumGas).unwrap(),
            "\"LIQUID_PETROLEUM_GAS\""
        );
        assert_eq!(
            serde_json::to_string(&HeatSource::AmbientAir).unwrap(),
            "\"AMBIENT_AIR\""
        );
    }
}
