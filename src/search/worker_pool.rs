//! Fixed-size worker pool draining a `TaskGenerator` and feeding results
//! into a `LeagueTable`.
//!
//! Workers are plain scoped `std::thread`s rather than an async runtime:
//! the work is CPU-bound simulation, there is no I/O to overlap, and a
//! scope lets every worker borrow the read-only `SiteData`/`CostModel`/
//! builder closure without any `Arc` cloning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;

use crate::cost::CostModel;
use crate::metrics::{self, SimulationMetrics};
use crate::search::league_table::{LeagueTable, Objective};
use crate::search::task_generator::{ScenarioPoint, TaskGenerator};
use crate::sim::simulator::Simulator;
use crate::sim::types::SimulationMode;
use crate::site_data::SiteData;
use crate::task::TaskData;

/// One row of the exhaustive log: the scenario that was run and the metrics
/// it produced against the baseline.
#[derive(Debug, Clone)]
pub struct ScenarioRecord {
    pub index: u64,
    pub task: TaskData,
    pub metrics: SimulationMetrics,
    pub comparison: metrics::ScenarioComparison,
}

/// Runs `task_generator` to exhaustion across `worker_count` threads,
/// converting each `ScenarioPoint` to a `TaskData` via `build_task`,
/// simulating it, and offering the resulting objectives to `league_table`.
///
/// `log_sink`, if given, receives every `ScenarioRecord` for exhaustive
/// CSV export; the bounded channel applies natural back-pressure, so a slow
/// writer thread throttles the whole pool rather than unbounded memory
/// growth.
#[expect(clippy::too_many_arguments)]
pub fn run(
    worker_count: usize,
    task_generator: &TaskGenerator,
    site: &SiteData,
    cost_model: &CostModel,
    baseline: &SimulationMetrics,
    build_task: &(dyn Fn(&ScenarioPoint) -> TaskData + Sync),
    league_table: &LeagueTable,
    log_sink: Option<&SyncSender<ScenarioRecord>>,
) -> WorkerPoolSummary {
    let stop = AtomicBool::new(false);
    let simulator = Simulator::new(site);

    let completed = std::sync::atomic::AtomicU64::new(0);
    let failed = std::sync::atomic::AtomicU64::new(0);

    std::thread::scope(|scope| {
        for _ in 0..worker_count.max(1) {
            scope.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    let Some(claimed) = task_generator.next_task() else {
                        break;
                    };
                    let task = build_task(&claimed.point);

                    match simulator.simulate(&task, SimulationMode::ResultOnly) {
                        Ok(result) => match metrics::simulation_metrics(&task, site, cost_model, &result) {
                            Ok(scenario_metrics) => {
                                let comparison = metrics::compare_to_baseline(&scenario_metrics, baseline, &task, cost_model);
                                offer_all(league_table, claimed.index, &scenario_metrics, &comparison);
                                completed.fetch_add(1, Ordering::Relaxed);

                                if let Some(sink) = log_sink {
                                    let record = ScenarioRecord {
                                        index: claimed.index,
                                        task,
                                        metrics: scenario_metrics,
                                        comparison,
                                    };
                                    // A closed receiver means the writer thread exited;
                                    // there is nothing left to log for, not a reason to stop simulating.
                                    let _ = sink.send(record);
                                }
                            }
                            Err(_) => {
                                failed.fetch_add(1, Ordering::Relaxed);
                            }
                        },
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
    });

    WorkerPoolSummary {
        completed: completed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    }
}

/// Counts from one exhaustive search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPoolSummary {
    pub completed: u64,
    pub failed: u64,
}

fn offer_all(
    league_table: &LeagueTable,
    index: u64,
    scenario: &SimulationMetrics,
    comparison: &metrics::ScenarioComparison,
) {
    league_table.offer(Objective::Capex, index, scenario.capex.total);
    league_table.offer(
        Objective::AnnualisedCost,
        index,
        scenario.meter_cost - scenario.meter_revenue + scenario.annual_opex.total,
    );
    league_table.offer(Objective::PaybackHorizon, index, comparison.payback_horizon_years);
    league_table.offer(Objective::CostBalance, index, comparison.operating_balance);
    league_table.offer(Objective::CarbonBalance, index, comparison.carbon_balance_kg);
}
