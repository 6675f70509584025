use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use strokesim_core::{
    Patient, Results, RunSettings, Severity, Sex, StrokeCenter, StrokeModel,
};

mod io;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "strokesim")]
#[command(about = "Monte Carlo triage simulator for acute ischemic stroke transport")]
struct Args {
    /// Path to the hospital roster CSV
    #[arg(long)]
    hospital_file: PathBuf,

    /// Path to the travel-time CSV (one row per patient location)
    #[arg(long)]
    times_file: PathBuf,

    /// Patient sex (male or female)
    #[arg(long, default_value = "male", value_parser = parse_sex)]
    sex: Sex,

    /// Patient age in years
    #[arg(long, default_value_t = 70)]
    age: u8,

    /// Prehospital RACE score, 0-9
    #[arg(long, conflicts_with = "nihss")]
    race: Option<f64>,

    /// NIHSS score, 0-42, instead of a RACE score
    #[arg(long)]
    nihss: Option<f64>,

    /// Minutes from symptom onset to the transport decision
    #[arg(long, default_value_t = 50.0)]
    time_since_symptoms: f64,

    /// Travel-time rows to simulate, starting from the first
    #[arg(long, default_value_t = 1)]
    patients: usize,

    /// Simulated patients per run in fixed-size mode
    #[arg(long, default_value_t = 1000)]
    simulations: usize,

    /// Grow the sample adaptively until destination choices converge
    #[arg(long)]
    adaptive: bool,

    /// Willingness to pay per QALY for the net monetary benefit
    #[arg(long, default_value_t = 1_000_000.0)]
    threshold_icer: f64,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Hold travel times at their nominal values
    #[arg(long)]
    fixed_travel_times: bool,

    /// Use the LVO point estimate instead of the uncertainty envelope
    #[arg(long)]
    fixed_lvo_probability: bool,

    /// Hold in-hospital performance at the reported medians
    #[arg(long)]
    fix_performance: bool,

    /// Dollar year for all costs
    #[arg(long, default_value_t = 2016)]
    cost_year: u16,

    /// Emit results as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn parse_sex(raw: &str) -> Result<Sex, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Sex::Male),
        "female" | "f" => Ok(Sex::Female),
        other => Err(format!("unknown sex {other:?} (expected male or female)")),
    }
}

#[derive(Debug, Serialize)]
struct LocationReport {
    location: String,
    seed: u64,
    results: Results,
}

fn print_table(report: &LocationReport, centers: &[StrokeCenter]) {
    let results = &report.results;
    println!("Location {} ({} samples):", report.location, results.n_samples);
    println!(
        "  {:<28} {:>8} {:>7} {:>12} {:>14}",
        "center", "chosen", "freq", "mean QALYs", "mean cost"
    );
    for summary in &results.centers {
        let name = centers
            .iter()
            .find(|c| c.center_id == summary.center_id)
            .map_or("?", |c| c.name.as_str());
        println!(
            "  {:<28} {:>8} {:>7.3} {:>12.3} {:>14.2}",
            format!("{} (id {})", name, summary.center_id.0),
            summary.times_chosen,
            summary.times_chosen as f64 / results.n_samples as f64,
            summary.mean_qalys,
            summary.mean_costs,
        );
    }
    match results.optimal_destination {
        Some(id) => {
            let name = centers
                .iter()
                .find(|c| c.center_id == id)
                .map_or("?", |c| c.name.as_str());
            println!("  optimal destination: {} (id {})", name, id.0);
        }
        None => println!("  optimal destination: none"),
    }
    println!();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(&args.log_level)?;

    let severity = match (args.race, args.nihss) {
        (_, Some(nihss)) => Severity::from_nihss(nihss)?,
        (Some(race), None) => Severity::from_race(race)?,
        (None, None) => Severity::from_race(8.0)?,
    };
    let patient = Patient::new(args.sex, args.age, severity, args.time_since_symptoms);

    let centers = io::read_hospitals(&args.hospital_file)?;
    let locations = io::read_travel_times(&args.times_file)?;
    info!(
        hospitals = centers.len(),
        locations = locations.len(),
        "inputs loaded"
    );

    let settings = RunSettings {
        add_time_uncertainty: !args.fixed_travel_times,
        add_lvo_uncertainty: !args.fixed_lvo_probability,
        fix_performance: args.fix_performance,
        cost_year: args.cost_year,
    };
    let base_seed: u64 = args.seed.unwrap_or_else(rand::random);
    info!(base_seed, adaptive = args.adaptive, "starting simulation");

    let mut reports = Vec::new();
    for (row, (location, lookup)) in locations.iter().take(args.patients).enumerate() {
        let mut model = StrokeModel::new(patient, centers.clone())
            .with_threshold_icer(args.threshold_icer);
        model.set_times(lookup);

        let seed = base_seed.wrapping_add(row as u64);
        let run = if args.adaptive {
            model.run_adaptive(seed, &settings)
        } else {
            model.run(seed, args.simulations, &settings)
        };
        let run = match run {
            Ok(run) => run,
            Err(err) => {
                warn!(location = %location, error = %err, "skipping location");
                continue;
            }
        };

        let report = LocationReport {
            location: location.clone(),
            seed,
            results: run.results,
        };
        if !args.json {
            print_table(&report, &centers);
        }
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    info!(simulated = reports.len(), "done");
    Ok(())
}
