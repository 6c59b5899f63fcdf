//! Centralized physical and regulatory constants.
//!
//! These values are never read from `TaskConfig` or any other mutable
//! configuration — callers who need different values are modelling a
//! different standard, not tuning this one.

/// Domestic hot-water cylinder thermal constants.
pub mod dhw {
    /// Density of water, kg/L.
    pub const RHO_KG_PER_L: f64 = 1.0;
    /// Specific heat capacity of water, kJ/(kg·°C).
    pub const C_W_KJ_PER_KG_C: f64 = 4.18;
    /// Cold feed temperature, °C.
    pub const T_COLD_C: f64 = 10.0;
    /// Ambient (standby loss reference) temperature, °C.
    pub const T_AMBIENT_C: f64 = 20.0;
    /// Cylinder thermostat set temperature, °C.
    pub const T_SET_C: f64 = 60.0;

    /// Standby-loss heat-transfer coefficient, W/°C, for a cylinder of volume `v_litres`.
    ///
    /// `U(V) = 1.70 * (V / 250)^(2/3)`.
    pub fn standby_loss_coefficient_w_per_c(v_litres: f64) -> f64 {
        1.70 * (v_litres / 250.0).powf(2.0 / 3.0)
    }
}

/// Energy storage system constants.
pub mod ess {
    /// Fixed round-trip loss fraction charged against every charge event.
    pub const ROUND_TRIP_LOSS_FRACTION: f64 = 0.14;
    /// Divisor for the aux parasitic load: `capacity_kwh / AUX_LOAD_DIVISOR` kW.
    pub const AUX_LOAD_DIVISOR: f64 = 1200.0;
}

/// Carbon emission factors, kg CO2e per kWh of fuel burned.
pub mod carbon {
    /// Natural gas combustion emission factor.
    pub const NATURAL_GAS_KG_PER_KWH: f64 = 0.201;
    /// Liquid petroleum gas combustion emission factor.
    pub const LPG_KG_PER_KWH: f64 = 0.239;
}

/// Backup/boiler gas heater constants.
pub mod gas_heater {
    /// Fraction of fuel energy converted to usable heat.
    pub const BOILER_EFFICIENCY: f64 = 0.9;
}

/// SAP 10.2 rating bands, shared by the Environmental Impact (EI) and Energy
/// Cost (EC) ratings.
pub mod sap {
    use crate::ratings::RatingGrade;

    /// Lower-inclusive band boundaries, highest score first (SAP 10.2 banding
    /// is shared in structure by EI and EC, differing only in how the
    /// underlying index is computed upstream).
    const BANDS: [(f64, RatingGrade); 7] = [
        (92.0, RatingGrade::A),
        (81.0, RatingGrade::B),
        (69.0, RatingGrade::C),
        (55.0, RatingGrade::D),
        (39.0, RatingGrade::E),
        (21.0, RatingGrade::F),
        (f64::NEG_INFINITY, RatingGrade::G),
    ];

    /// Maps a SAP index (0-100+ scale) to its rating band.
    pub fn band_for_index(index: f64) -> RatingGrade {
        for (lower, grade) in BANDS {
            if index >= lower {
                return grade;
            }
        }
        RatingGrade::G
    }
}

/// Funding scheme amounts.
pub mod funding {
    /// Fixed grant paid when a heat pump replaces a gas heater under the
    /// boiler upgrade scheme, GBP.
    pub const BOILER_UPGRADE_SCHEME_GRANT_GBP: f64 = 7_500.0;
}

/// Default plant lifetimes, years, used when a caller omits `lifetime_years`
/// on a component record. These are starting points, not mandates — every
/// component record carries its own `lifetime_years` field that overrides
/// the default at construction time.
pub mod lifetime {
    pub const SOLAR_PANELS_YEARS: f64 = 25.0;
    pub const BATTERY_YEARS: f64 = 10.0;
    pub const HEAT_PUMP_YEARS: f64 = 15.0;
    pub const GAS_HEATER_YEARS: f64 = 15.0;
    pub const DHW_CYLINDER_YEARS: f64 = 20.0;
    pub const EV_CHARGER_YEARS: f64 = 10.0;
    pub const BUILDING_FABRIC_YEARS: f64 = 30.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standby_loss_matches_reference_cylinder() {
        // A 250L cylinder should give exactly the 1.70 W/°C base coefficient.
        let u = dhw::standby_loss_coefficient_w_per_c(250.0);
        assert!((u - 1.70).abs() < 1e-9);
    }

    #[test]
    fn standby_loss_scales_with_volume() {
        let small = dhw::standby_loss_coefficient_w_per_c(125.0);
        let large = dhw::standby_loss_coefficient_w_per_c(500.0);
        assert!(small < large);
    }

    #[test]
    fn sap_band_boundaries() {
        use crate::ratings::RatingGrade;
        assert_eq!(sap::band_for_index(100.0), RatingGrade::A);
        assert_eq!(sap::band_for_index(92.0), RatingGrade::A);
        assert_eq!(sap::band_for_index(91.9), RatingGrade::B);
        assert_eq!(sap::band_for_index(20.0), RatingGrade::G);
        assert_eq!(sap::band_for_index(-5.0), RatingGrade::G);
    }
}
