//! Piecewise-linear cost models and the per-family cost table they back.

use serde::{Deserialize, Serialize};

use crate::error::{EpochError, EpochResult};

/// One segment of a piecewise-linear cost curve: applies `rate` per unit up
/// to and including `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSegment {
    pub upper: f64,
    pub rate: f64,
}

/// `fixed_cost + Σ segment contributions + final_rate × (n − last_upper)_+`.
///
/// Segments must be strictly increasing by `upper`; `final_rate` applies to
/// the remainder above the last segment's `upper`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseCostModel {
    pub fixed_cost: f64,
    pub segments: Vec<CostSegment>,
    pub final_rate: f64,
}

impl PiecewiseCostModel {
    /// Validates that segments are strictly increasing by `upper`.
    pub fn validate(&self, name: &str) -> EpochResult<()> {
        let mut prev = 0.0;
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 && seg.upper <= prev {
                return Err(EpochError::InvalidParamRange {
                    axis: name.to_string(),
                    message: format!(
                        "segment {i} upper {} must exceed previous upper {prev}",
                        seg.upper
                    ),
                });
            }
            prev = seg.upper;
        }
        Ok(())
    }

    /// Total cost for `n` units, `n ≥ 0`.
    pub fn cost(&self, n: f64) -> f64 {
        if n <= 0.0 {
            return self.fixed_cost;
        }

        let mut total = self.fixed_cost;
        let mut lower = 0.0;
        for seg in &self.segments {
            if n <= lower {
                return total;
            }
            let span = (n.min(seg.upper) - lower).max(0.0);
            total += span * seg.rate;
            lower = seg.upper;
        }

        if n > lower {
            total += (n - lower) * self.final_rate;
        }
        total
    }
}

/// Per-family piecewise rate tables. Each field is optional: a missing table
/// means that family is never costed (used only for components that can
/// never appear, e.g. a deployment with no data centre offering).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostModel {
    pub building_fabric: Option<PiecewiseCostModel>,
    pub dhw: Option<PiecewiseCostModel>,
    pub ess: Option<PiecewiseCostModel>,
    pub heat_pump: Option<PiecewiseCostModel>,
    pub gas_heater: Option<PiecewiseCostModel>,
    pub solar: Option<PiecewiseCostModel>,
    pub ev_charger: Option<PiecewiseCostModel>,
    pub data_centre: Option<PiecewiseCostModel>,
    pub mop: Option<PiecewiseCostModel>,

    pub building_fabric_opex: Option<PiecewiseCostModel>,
    pub dhw_opex: Option<PiecewiseCostModel>,
    pub ess_opex: Option<PiecewiseCostModel>,
    pub heat_pump_opex: Option<PiecewiseCostModel>,
    pub gas_heater_opex: Option<PiecewiseCostModel>,
    pub solar_opex: Option<PiecewiseCostModel>,
    pub ev_charger_opex: Option<PiecewiseCostModel>,
    pub data_centre_opex: Option<PiecewiseCostModel>,
    pub mop_opex: Option<PiecewiseCostModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PiecewiseCostModel {
        PiecewiseCostModel {
            fixed_cost: 50.0,
            segments: vec![CostSegment {
                upper: 10.0,
                rate: 5.0,
            }],
            final_rate: 2.0,
        }
    }

    #[test]
    fn cost_at_zero_is_fixed_cost() {
        assert_eq!(sample().cost(0.0), 50.0);
    }

    #[test]
    fn cost_at_segment_boundary() {
        assert_eq!(sample().cost(10.0), 100.0);
    }

    #[test]
    fn cost_beyond_segments_uses_final_rate() {
        assert_eq!(sample().cost(20.0), 120.0);
    }

    #[test]
    fn cost_is_monotonic_non_decreasing() {
        let model = sample();
        let mut prev = model.cost(0.0);
        let mut n = 0.5;
        while n <= 50.0 {
            let c = model.cost(n);
            assert!(c >= prev - 1e-9);
            prev = c;
            n += 0.5;
        }
    }

    #[test]
    fn validate_rejects_non_increasing_segments() {
        let model = PiecewiseCostModel {
            fixed_cost: 0.0,
            segments: vec![
                CostSegment {
                    upper: 10.0,
                    rate: 1.0,
                },
                CostSegment {
                    upper: 10.0,
                    rate: 2.0,
                },
            ],
            final_rate: 1.0,
        };
        assert!(model.validate("x").is_err());
    }
}
