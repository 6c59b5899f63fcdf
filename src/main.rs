//! EPOCH core demo binary — runs a small exhaustive search over a built-in
//! site and prints the best scenario found per objective.
//!
//! This is a thin driver over the library, not the product: real site data,
//! component grids, and cost tables are expected to be supplied by a caller
//! embedding `epoch_core` rather than hardcoded here.

use std::path::PathBuf;
use std::process;

use epoch_core::cost::CostModel;
use epoch_core::metrics;
use epoch_core::search::league_table::{LeagueTable, Objective};
use epoch_core::search::task_generator::{AxisSpec, ScenarioPoint, TaskGenerator};
use epoch_core::search::worker_pool;
use epoch_core::sim::simulator::Simulator;
use epoch_core::sim::types::SimulationMode;
use epoch_core::site_data::{AshpTable, SiteData};
use epoch_core::task::{
    BatteryMode, BuildingConfig, ComponentLifecycle, EssConfig, GridConfig, TaskConfig, TaskData,
};

fn print_help() {
    eprintln!("epoch-core — deterministic half-hourly site-energy search demo");
    eprintln!();
    eprintln!("Usage: epoch-core [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <dir>     Directory for per-objective league CSVs (default: ./epoch-out)");
    eprintln!("  --workers <n>   Worker thread count (default: 4)");
    eprintln!("  --help          Show this help message");
}

struct CliArgs {
    out_dir: PathBuf,
    workers: usize,
}

fn parse_args() -> CliArgs {
    let mut out_dir = PathBuf::from("./epoch-out");
    let mut workers = 4usize;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                out_dir = PathBuf::from(&args[i]);
            }
            "--workers" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --workers requires a count argument");
                    process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(n) => workers = n,
                    Err(_) => {
                        eprintln!("error: --workers value \"{}\" is not a valid count", args[i]);
                        process::exit(1);
                    }
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    CliArgs { out_dir, workers }
}

/// A flat 24-step demo day: constant building load, flat tariff, one solar
/// yield series, and a single-point ASHP table.
fn demo_site() -> SiteData {
    let n = 24;
    SiteData {
        start_ts: 0,
        end_ts: (n as i64) * 1800,
        timestep_interval_s: 1800,
        building_eload: vec![1.2; n],
        building_hload: vec![0.8; n],
        ev_eload: vec![0.0; n],
        dhw_demand: vec![0.0; n],
        air_temperature: vec![8.0; n],
        grid_co2: vec![0.18; n],
        solar_yields: vec![vec![0.6; n]],
        import_tariffs: vec![vec![0.22; n]],
        fabric_interventions: vec![],
        ashp_input_table: AshpTable {
            air_temps_c: vec![0.0],
            send_temps_c: vec![45.0],
            values: vec![vec![1.0]],
        },
        ashp_output_table: AshpTable {
            air_temps_c: vec![0.0],
            send_temps_c: vec![45.0],
            values: vec![vec![3.0]],
        },
    }
}

fn baseline_task() -> TaskData {
    TaskData {
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
            capex_limit: 50_000.0,
            use_boiler_upgrade_scheme: false,
            general_grant_funding: 0.0,
            npv_time_horizon: 15,
            npv_discount_factor: 0.035,
        },
    }
}

/// Turns a scenario point's `ess_capacity_kwh` axis into a battery choice,
/// leaving every other slot at the baseline.
fn build_task(point: &ScenarioPoint) -> TaskData {
    let mut task = baseline_task();
    let capacity = point["ess_capacity_kwh"];
    if capacity > 0.0 {
        task.ess = Some(EssConfig {
            lifecycle: ComponentLifecycle {
                incumbent: false,
                age_years: 0.0,
                lifetime_years: 10.0,
            },
            capacity_kwh: capacity,
            charge_power_kw: capacity.min(5.0),
            discharge_power_kw: capacity.min(5.0),
            initial_charge_kwh: 0.0,
            mode: BatteryMode::Consume,
        });
    }
    task
}

fn main() {
    let cli = parse_args();

    let site = demo_site();
    let cost_model = CostModel::default();
    let simulator = Simulator::new(&site);

    let baseline_result = match simulator.simulate(&baseline_task(), SimulationMode::ResultOnly) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: baseline simulation failed: {err}");
            process::exit(1);
        }
    };
    let baseline = match metrics::simulation_metrics(&baseline_task(), &site, &cost_model, &baseline_result) {
        Ok(metrics) => metrics,
        Err(err) => {
            eprintln!("error: baseline metrics failed: {err}");
            process::exit(1);
        }
    };

    let generator = TaskGenerator::new(vec![(
        "ess_capacity_kwh".to_string(),
        AxisSpec::Range {
            min: 0.0,
            max: 10.0,
            step: 1.0,
        },
    )])
    .expect("demo axis is well-formed");

    let league_table = LeagueTable::new(5);
    let summary = worker_pool::run(
        cli.workers,
        &generator,
        &site,
        &cost_model,
        &baseline,
        &build_task,
        &league_table,
        None,
    );

    println!(
        "ran {} scenarios ({} failed) across {} workers",
        summary.completed, summary.failed, cli.workers
    );

    if let Err(err) = epoch_core::io::csv_writer::write_league_tables(&league_table, &cli.out_dir) {
        eprintln!("error: failed writing league tables: {err}");
        process::exit(1);
    }

    for objective in Objective::ALL {
        if let Some(best) = league_table.best(objective).into_iter().next() {
            println!("best {objective:?}: scenario {} = {:.4}", best.index, best.value);
        }
    }
    println!("league tables written to {}", cli.out_dir.display());
}
