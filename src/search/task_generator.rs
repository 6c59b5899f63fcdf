//! Enumerates the Cartesian product of a named parameter grid.
//!
//! A `TaskGenerator` only knows about scalar axis values; turning a
//! `ScenarioPoint` into a concrete `TaskData` is the caller's wiring (the
//! core exposes the primitive, not a fixed axis-to-component mapping).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{EpochError, EpochResult};

/// One named axis: either a single fixed value, or an inclusive range
/// expanded to evenly spaced values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSpec {
    Fixed(f64),
    Range { min: f64, max: f64, step: f64 },
}

impl AxisSpec {
    fn expand(&self, name: &str) -> EpochResult<Vec<f64>> {
        match *self {
            AxisSpec::Fixed(v) => Ok(vec![v]),
            AxisSpec::Range { min, max, step } => {
                if max < min {
                    return Err(EpochError::InvalidParamRange {
                        axis: name.to_string(),
                        message: format!("max {max} < min {min}"),
                    });
                }
                if step < 0.0 {
                    return Err(EpochError::InvalidParamRange {
                        axis: name.to_string(),
                        message: "step must be >= 0".to_string(),
                    });
                }
                if step == 0.0 {
                    if min == max {
                        return Ok(vec![min]);
                    }
                    return Err(EpochError::InvalidParamRange {
                        axis: name.to_string(),
                        message: "step == 0 with distinct endpoints".to_string(),
                    });
                }
                let count = ((max - min) / step).round() as u64 + 1;
                Ok((0..count).map(|i| min + i as f64 * step).collect())
            }
        }
    }
}

/// A decoded scenario: axis name → chosen value.
pub type ScenarioPoint = BTreeMap<String, f64>;

/// A scenario paired with its 1-based index, as produced by the streaming
/// cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWithIndex {
    pub index: u64,
    pub point: ScenarioPoint,
}

/// Enumerates the Cartesian product of `axes`, in declaration order (axis 0
/// varies fastest).
pub struct TaskGenerator {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
    cardinalities: Vec<u64>,
    total: u64,
    cursor: AtomicU64,
}

impl TaskGenerator {
    /// Builds a generator from an ordered list of `(axis name, spec)`
    /// pairs. Fails at construction time if any axis spec is malformed.
    pub fn new(axes: Vec<(String, AxisSpec)>) -> EpochResult<Self> {
        let mut names = Vec::with_capacity(axes.len());
        let mut values = Vec::with_capacity(axes.len());
        let mut cardinalities = Vec::with_capacity(axes.len());
        let mut total: u64 = 1;

        for (name, spec) in axes {
            let expanded = spec.expand(&name)?;
            cardinalities.push(expanded.len() as u64);
            total = total
                .checked_mul(expanded.len() as u64)
                .ok_or_else(|| EpochError::InvalidParamRange {
                    axis: name.clone(),
                    message: "total scenario count overflows u64".to_string(),
                })?;
            names.push(name);
            values.push(expanded);
        }

        Ok(Self {
            names,
            values,
            cardinalities,
            total,
            cursor: AtomicU64::new(1),
        })
    }

    /// The size of the Cartesian product.
    pub fn total_scenarios(&self) -> u64 {
        self.total
    }

    /// O(axes) random access via mixed-radix decoding of a 1-based index.
    pub fn get_task(&self, index: u64) -> EpochResult<ScenarioPoint> {
        if index == 0 || index > self.total {
            return Err(EpochError::InvalidTaskData {
                field: "scenario_index".to_string(),
                message: format!("{index} out of range 1..={}", self.total),
            });
        }

        let mut remainder = index - 1;
        let mut point = ScenarioPoint::new();
        for i in 0..self.names.len() {
            let card = self.cardinalities[i];
            let axis_index = (remainder % card) as usize;
            remainder /= card;
            point.insert(self.names[i].clone(), self.values[i][axis_index]);
        }
        Ok(point)
    }

    /// Atomically claims the next scenario index and decodes it. Returns
    /// `None` once every scenario has been claimed; many workers may call
    /// this concurrently.
    pub fn next_task(&self) -> Option<TaskWithIndex> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        if index > self.total {
            return None;
        }
        let point = self.get_task(index).expect("cursor never exceeds total");
        Some(TaskWithIndex { index, point })
    }
}
