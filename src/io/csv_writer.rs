//! CSV export for the scenario search: one exhaustive log plus a best-N /
//! worst-1 file per objective.
//!
//! The exhaustive log is written by a single dedicated thread draining a
//! bounded channel, the same shape as the rest of the core's producer/worker
//! split: workers never block on file I/O, and a full channel applies
//! back-pressure onto the search instead of letting memory grow unbounded.

use std::io;
use std::path::Path;
use std::sync::mpsc::{Receiver, SyncSender};
use std::thread::JoinHandle;

use crate::search::league_table::{LeagueTable, Objective};
use crate::search::worker_pool::ScenarioRecord;
use crate::task::{ComponentLifecycle, TaskData};

/// Column names for `TaskData`'s fields, in declaration order, each
/// component's own fields (lifecycle first) flattened inline. Solar is a
/// `Vec`, summarised as a count plus total installed capacity rather than
/// one column per panel, since the panel count varies per scenario.
const TASK_FIELDS: &[&str] = &[
    "building_fabric_intervention_index",
    "building_eload_scalar",
    "building_hload_scalar",
    "dhw_incumbent",
    "dhw_age_years",
    "dhw_lifetime_years",
    "dhw_volume_litres",
    "dhw_initial_soc_kwh",
    "dhw_topup_power_kw",
    "ess_incumbent",
    "ess_age_years",
    "ess_lifetime_years",
    "ess_capacity_kwh",
    "ess_charge_power_kw",
    "ess_discharge_power_kw",
    "ess_initial_charge_kwh",
    "ess_mode",
    "heat_pump_incumbent",
    "heat_pump_age_years",
    "heat_pump_lifetime_years",
    "heat_pump_source",
    "heat_pump_send_temp_c",
    "heat_pump_rated_capacity_kw",
    "gas_heater_incumbent",
    "gas_heater_age_years",
    "gas_heater_lifetime_years",
    "gas_heater_gas_type",
    "gas_heater_rated_power_kw",
    "solar_panel_count",
    "solar_total_capacity_kwp",
    "ev_charger_incumbent",
    "ev_charger_age_years",
    "ev_charger_lifetime_years",
    "ev_charger_count",
    "ev_charger_rated_power_kw",
    "data_centre_incumbent",
    "data_centre_age_years",
    "data_centre_lifetime_years",
    "data_centre_rated_power_kw",
    "grid_incumbent",
    "grid_age_years",
    "grid_lifetime_years",
    "grid_import_limit_kw",
    "grid_export_limit_kw",
    "grid_import_headroom",
    "grid_tariff_index",
    "grid_export_tariff",
    "mop_incumbent",
    "mop_age_years",
    "mop_lifetime_years",
    "mop_rated_power_kw",
    "config_capex_limit",
    "config_use_boiler_upgrade_scheme",
    "config_general_grant_funding",
    "config_npv_time_horizon",
    "config_npv_discount_factor",
];

const METRIC_FIELDS: &[&str] = &[
    "capex_total",
    "annual_opex_total",
    "meter_cost",
    "meter_revenue",
    "scope_1_carbon_kg",
    "scope_2_carbon_kg",
    "combined_carbon_balance",
    "ei_rating",
    "ec_rating",
    "operating_balance",
    "payback_horizon_years",
    "roi",
    "npv",
    "carbon_balance_kg",
];

/// Spawns the exhaustive-log writer thread. Send every `ScenarioRecord`
/// produced by the worker pool down the returned channel; drop the sender
/// and join the handle to flush and close the file.
pub fn spawn_exhaustive_writer(path: impl AsRef<Path>, channel_bound: usize) -> io::Result<(SyncSender<ScenarioRecord>, JoinHandle<io::Result<()>>)> {
    let (tx, rx) = std::sync::mpsc::sync_channel(channel_bound);
    let file = std::fs::File::create(path)?;
    let handle = std::thread::spawn(move || drain_exhaustive(rx, file));
    Ok((tx, handle))
}

fn drain_exhaustive(rx: Receiver<ScenarioRecord>, file: std::fs::File) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(io::BufWriter::new(file));
    wtr.write_record(
        std::iter::once("scenario_index")
            .chain(TASK_FIELDS.iter().copied())
            .chain(METRIC_FIELDS.iter().copied()),
    )?;

    for record in rx {
        let mut row = vec![record.index.to_string()];
        row.extend(task_row(&record.task));
        row.push(format!("{:.4}", record.metrics.capex.total));
        row.push(format!("{:.4}", record.metrics.annual_opex.total));
        row.push(format!("{:.4}", record.metrics.meter_cost));
        row.push(format!("{:.4}", record.metrics.meter_revenue));
        row.push(format!("{:.4}", record.metrics.scope_1_carbon_kg));
        row.push(format!("{:.4}", record.metrics.scope_2_carbon_kg));
        row.push(format!("{:.4}", record.metrics.combined_carbon_balance));
        row.push(record.metrics.ei_rating.to_string());
        row.push(record.metrics.ec_rating.to_string());
        row.push(format!("{:.4}", record.comparison.operating_balance));
        row.push(format!("{:.4}", record.comparison.payback_horizon_years));
        row.push(format!("{:.4}", record.comparison.roi));
        row.push(format!("{:.4}", record.comparison.npv));
        row.push(format!("{:.4}", record.comparison.carbon_balance_kg));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Flattens `task`'s fields into `TASK_FIELDS`-ordered column values.
fn task_row(task: &TaskData) -> Vec<String> {
    let mut row = Vec::with_capacity(TASK_FIELDS.len());

    row.push(task.building.fabric_intervention_index.to_string());
    row.push(format!("{:.4}", task.building.eload_scalar));
    row.push(format!("{:.4}", task.building.hload_scalar));

    push_lifecycle(&mut row, task.dhw.map(|c| c.lifecycle));
    row.push(opt_f(task.dhw.map(|c| c.volume_litres)));
    row.push(opt_f(task.dhw.map(|c| c.initial_soc_kwh)));
    row.push(opt_f(task.dhw.map(|c| c.topup_power_kw)));

    push_lifecycle(&mut row, task.ess.map(|c| c.lifecycle));
    row.push(opt_f(task.ess.map(|c| c.capacity_kwh)));
    row.push(opt_f(task.ess.map(|c| c.charge_power_kw)));
    row.push(opt_f(task.ess.map(|c| c.discharge_power_kw)));
    row.push(opt_f(task.ess.map(|c| c.initial_charge_kwh)));
    row.push(task.ess.map(|c| format!("{:?}", c.mode)).unwrap_or_default());

    push_lifecycle(&mut row, task.heat_pump.map(|c| c.lifecycle));
    row.push(task.heat_pump.map(|c| format!("{:?}", c.source)).unwrap_or_default());
    row.push(opt_f(task.heat_pump.map(|c| c.send_temp_c)));
    row.push(opt_f(task.heat_pump.map(|c| c.rated_capacity_kw)));

    push_lifecycle(&mut row, task.gas_heater.map(|c| c.lifecycle));
    row.push(task.gas_heater.map(|c| format!("{:?}", c.gas_type)).unwrap_or_default());
    row.push(opt_f(task.gas_heater.map(|c| c.rated_power_kw)));

    row.push(task.solar.len().to_string());
    row.push(format!("{:.4}", task.solar.iter().map(|p| p.capacity_kwp).sum::<f64>()));

    push_lifecycle(&mut row, task.ev_charger.map(|c| c.lifecycle));
    row.push(task.ev_charger.map(|c| c.charger_count.to_string()).unwrap_or_default());
    row.push(opt_f(task.ev_charger.map(|c| c.rated_power_kw)));

    push_lifecycle(&mut row, task.data_centre.map(|c| c.lifecycle));
    row.push(opt_f(task.data_centre.map(|c| c.rated_power_kw)));

    push_lifecycle(&mut row, Some(task.grid.lifecycle));
    row.push(format!("{:.4}", task.grid.import_limit_kw));
    row.push(format!("{:.4}", task.grid.export_limit_kw));
    row.push(format!("{:.4}", task.grid.import_headroom));
    row.push(task.grid.tariff_index.to_string());
    row.push(format!("{:.4}", task.grid.export_tariff));

    push_lifecycle(&mut row, task.mop.map(|c| c.lifecycle));
    row.push(opt_f(task.mop.map(|c| c.rated_power_kw)));

    row.push(format!("{:.4}", task.config.capex_limit));
    row.push(task.config.use_boiler_upgrade_scheme.to_string());
    row.push(format!("{:.4}", task.config.general_grant_funding));
    row.push(task.config.npv_time_horizon.to_string());
    row.push(format!("{:.6}", task.config.npv_discount_factor));

    debug_assert_eq!(row.len(), TASK_FIELDS.len());
    row
}

fn opt_f(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

fn push_lifecycle(row: &mut Vec<String>, lifecycle: Option<ComponentLifecycle>) {
    match lifecycle {
        Some(l) => {
            row.push(l.incumbent.to_string());
            row.push(format!("{:.2}", l.age_years));
            row.push(format!("{:.2}", l.lifetime_years));
        }
        None => {
            row.push(String::new());
            row.push(String::new());
            row.push(String::new());
        }
    }
}

const LEAGUE_HEADER: &str = "rank,scenario_index,value";

/// Writes one CSV per objective under `dir`, named `<Objective>.csv`: the
/// best-N rows in rank order followed by a final row for the single worst
/// observed value.
pub fn write_league_tables(league_table: &LeagueTable, dir: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    for objective in Objective::ALL {
        let path = dir.join(format!("{}.csv", objective_file_stem(objective)));
        let file = std::fs::File::create(path)?;
        let mut wtr = csv::WriterBuilder::new().from_writer(io::BufWriter::new(file));
        wtr.write_record(LEAGUE_HEADER.split(','))?;

        for (rank, entry) in league_table.best(objective).into_iter().enumerate() {
            wtr.write_record(&[(rank + 1).to_string(), entry.index.to_string(), format!("{:.6}", entry.value)])?;
        }
        if let Some(worst) = league_table.worst(objective) {
            wtr.write_record(&["worst".to_string(), worst.index.to_string(), format!("{:.6}", worst.value)])?;
        }

        wtr.flush()?;
    }

    Ok(())
}

fn objective_file_stem(objective: Objective) -> &'static str {
    match objective {
        Objective::Capex => "CAPEX",
        Objective::AnnualisedCost => "AnnualisedCost",
        Objective::PaybackHorizon => "PaybackHorizon",
        Objective::CostBalance => "CostBalance",
        Objective::CarbonBalance => "CarbonBalance",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskData;

    #[test]
    fn league_csv_contains_header_best_rows_and_worst_row() {
        let table = LeagueTable::new(2);
        for (i, v) in [5.0, 1.0, 9.0, 3.0].into_iter().enumerate() {
            table.offer(Objective::Capex, i as u64 + 1, v);
        }
        let dir = tempfile::tempdir().unwrap();
        write_league_tables(&table, dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("CAPEX.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "rank,scenario_index,value");
        // 2 best rows + 1 worst row + header
        assert_eq!(lines.len(), 4);
        assert!(lines.last().unwrap().starts_with("worst,"));
    }

    #[test]
    fn writes_one_file_per_objective() {
        let table = LeagueTable::new(1);
        table.offer(Objective::Capex, 1, 10.0);
        let dir = tempfile::tempdir().unwrap();
        write_league_tables(&table, dir.path()).unwrap();
        for objective in Objective::ALL {
            assert!(dir.path().join(format!("{}.csv", objective_file_stem(objective))).exists());
        }
    }

    #[test]
    fn exhaustive_writer_flushes_on_handle_join() {
        use crate::task::{BuildingConfig, ComponentLifecycle, GridConfig, TaskConfig};

        let path = tempfile::NamedTempFile::new().unwrap();
        let (tx, handle) = spawn_exhaustive_writer(path.path(), 4).unwrap();

        let task = TaskData {
            building: BuildingConfig {
                fabric_intervention_index: 0,
                eload_scalar: 1.0,
                hload_scalar: 1.0,
            },
            dhw: None,
            ess: None,
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
                import_limit_kw: 100.0,
                export_limit_kw: 100.0,
                import_headroom: 0.0,
                tariff_index: 0,
                export_tariff: 0.05,
            },
            mop: None,
            config: TaskConfig {
                capex_limit: 1000.0,
                use_boiler_upgrade_scheme: false,
                general_grant_funding: 0.0,
                npv_time_horizon: 10,
                npv_discount_factor: 0.035,
            },
        };

        let metrics = crate::metrics::SimulationMetrics {
            capex: crate::metrics::CapexBreakdown::default(),
            annual_opex: crate::metrics::OpexBreakdown::default(),
            meter_cost: 1.0,
            meter_revenue: 0.0,
            scope_1_carbon_kg: 0.0,
            scope_2_carbon_kg: 0.0,
            combined_carbon_balance: 0.0,
            ei_rating: crate::ratings::RatingGrade::A,
            ec_rating: crate::ratings::RatingGrade::A,
        };
        let comparison = crate::metrics::ScenarioComparison {
            operating_balance: 0.0,
            payback_horizon_years: f64::INFINITY,
            roi: 0.0,
            npv: 0.0,
            carbon_balance_kg: 0.0,
        };

        tx.send(ScenarioRecord {
            index: 1,
            task,
            metrics,
            comparison,
        })
        .unwrap();
        drop(tx);
        handle.join().unwrap().unwrap();

        let content = std::fs::read_to_string(path.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
