//! Thread-safe retention of the best-N and single-worst result per
//! objective.
//!
//! The critical section only ever runs after a cheap, unlocked comparison
//! suggests the incoming result might actually improve something: a
//! snapshot of the current worst-of-best (and, separately, the current
//! single worst) is kept in atomics so most offers from a busy worker pool
//! never touch the mutex at all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// The five retained objectives. CAPEX, AnnualisedCost, and PaybackHorizon
/// are minimised; CostBalance and CarbonBalance (savings relative to
/// baseline) are maximised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Objective {
    Capex,
    AnnualisedCost,
    PaybackHorizon,
    CostBalance,
    CarbonBalance,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Objective::Capex,
        Objective::AnnualisedCost,
        Objective::PaybackHorizon,
        Objective::CostBalance,
        Objective::CarbonBalance,
    ];

    fn minimise(self) -> bool {
        matches!(
            self,
            Objective::Capex | Objective::AnnualisedCost | Objective::PaybackHorizon
        )
    }

    /// Whether `candidate` is strictly better than `incumbent` for this objective.
    fn better(self, candidate: f64, incumbent: f64) -> bool {
        if self.minimise() {
            candidate < incumbent
        } else {
            candidate > incumbent
        }
    }

    fn worst_sentinel(self) -> f64 {
        if self.minimise() {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// One retained result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub index: u64,
    pub value: f64,
}

struct ObjectiveTable {
    best: Vec<Entry>,
    worst: Option<Entry>,
}

impl ObjectiveTable {
    fn new() -> Self {
        Self {
            best: Vec::new(),
            worst: None,
        }
    }
}

struct Inner {
    tables: [ObjectiveTable; 5],
}

/// A bounded, per-objective best-N + worst-1 retention structure shared by
/// every search worker through one mutex.
pub struct LeagueTable {
    capacity: usize,
    inner: Mutex<Inner>,
    /// Cached worst-of-best value per objective, read without locking.
    cached_worst_of_best: [AtomicU64; 5],
    /// Cached single-worst value per objective, read without locking.
    cached_single_worst: [AtomicU64; 5],
}

fn objective_slot(objective: Objective) -> usize {
    Objective::ALL.iter().position(|&o| o == objective).unwrap()
}

impl LeagueTable {
    pub fn new(capacity: usize) -> Self {
        let sentinel_best = |o: Objective| o.worst_sentinel().to_bits();
        let sentinel_worst = |o: Objective| (-o.worst_sentinel()).to_bits();
        Self {
            capacity,
            inner: Mutex::new(Inner {
                tables: std::array::from_fn(|_| ObjectiveTable::new()),
            }),
            cached_worst_of_best: std::array::from_fn(|i| AtomicU64::new(sentinel_best(Objective::ALL[i]))),
            cached_single_worst: std::array::from_fn(|i| AtomicU64::new(sentinel_worst(Objective::ALL[i]))),
        }
    }

    /// Offers one result for one objective. Only locks the table if the
    /// unlocked snapshot suggests an improvement is possible.
    pub fn offer(&self, objective: Objective, index: u64, value: f64) {
        if value.is_nan() {
            return;
        }

        let slot = objective_slot(objective);
        let cached_best_threshold = f64::from_bits(self.cached_worst_of_best[slot].load(Ordering::Relaxed));
        let cached_worst = f64::from_bits(self.cached_single_worst[slot].load(Ordering::Relaxed));

        let might_improve_best = self.best_not_full(slot) || objective.better(value, cached_best_threshold);
        let might_replace_worst = objective.better(cached_worst, value);

        if !might_improve_best && !might_replace_worst {
            return;
        }

        let mut inner = self.inner.lock().unwrap();
        let table = &mut inner.tables[slot];

        if table.best.len() < self.capacity {
            table.best.push(Entry { index, value });
            sort_best(&mut table.best, objective);
        } else if let Some(worst_in_best) = table.best.last() {
            if objective.better(value, worst_in_best.value) {
                table.best.pop();
                table.best.push(Entry { index, value });
                sort_best(&mut table.best, objective);
            }
        }

        let worst_candidate_is_new_worst = match table.worst {
            None => true,
            Some(current) => objective.better(current.value, value),
        };
        if worst_candidate_is_new_worst {
            table.worst = Some(Entry { index, value });
        }

        let new_threshold = table
            .best
            .last()
            .map(|e| e.value)
            .unwrap_or_else(|| objective.worst_sentinel());
        self.cached_worst_of_best[slot].store(new_threshold.to_bits(), Ordering::Relaxed);
        if let Some(worst) = table.worst {
            self.cached_single_worst[slot].store(worst.value.to_bits(), Ordering::Relaxed);
        }
    }

    fn best_not_full(&self, slot: usize) -> bool {
        // Cheap heuristic without locking: a sentinel threshold means the
        // table has never filled to capacity for this objective.
        let cached = f64::from_bits(self.cached_worst_of_best[slot].load(Ordering::Relaxed));
        cached == Objective::ALL[slot].worst_sentinel()
    }

    /// Snapshot of the best-N entries for `objective`, best first.
    pub fn best(&self, objective: Objective) -> Vec<Entry> {
        self.inner.lock().unwrap().tables[objective_slot(objective)].best.clone()
    }

    /// Snapshot of the single worst entry observed for `objective`.
    pub fn worst(&self, objective: Objective) -> Option<Entry> {
        self.inner.lock().unwrap().tables[objective_slot(objective)].worst
    }

    pub fn len(&self, objective: Objective) -> usize {
        self.inner.lock().unwrap().tables[objective_slot(objective)].best.len()
    }

    pub fn is_empty(&self, objective: Objective) -> bool {
        self.len(objective) == 0
    }
}

fn sort_best(best: &mut [Entry], objective: Objective) {
    if objective.minimise() {
        best.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap());
    } else {
        best.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap());
    }
}
