use std::io;
use std::path::Path;
use std::process;
use std::time::Instant;

use anyhow::Result;

use hexfov::cli::{Args, Mode};
use hexfov::config::Config;
use hexfov::harness::{run_regression, run_step_through, run_unit, RunHistory};
use hexfov::utils::{self, Geometry, SeedRange};

fn run(args: Args, history: &mut RunHistory) -> Result<bool> {
    let mut config = Config::default();
    if let Some(config_path) = args.config_path.as_ref() {
        config.patch_from_yaml_file(config_path)?;
        history.add_message(format!("Loaded config {}", config_path));
    }
    if args.report_path.is_some() {
        config.report_path = args.report_path.clone();
    }
    let seeds = args.seeds.unwrap_or(SeedRange {
        start: config.seed_start,
        end: config.seed_end,
    });
    let geometry = args.geometry.unwrap_or(Geometry {
        width: config.width,
        height: config.height,
    });
    let view_cone = config.view_cone()?;

    match args.mode {
        Mode::Unit => Ok(run_unit(&args.scenarios, history)? == 0),
        Mode::Regression => {
            let report = run_regression(&config, seeds, geometry, view_cone, history);
            if let Some(report_path) = config.report_path.as_ref() {
                utils::write_json_file(Path::new(report_path), &report)?;
                history.add_message(format!("Report written to {}", report_path));
            }
            Ok(report.passed())
        }
        Mode::StepThrough => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_step_through(
                &config,
                seeds.start,
                geometry,
                view_cone,
                &mut stdin.lock(),
                &mut stdout.lock(),
            )?;
            Ok(true)
        }
    }
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .format_module_path(false)
        .init();
    let mut history = RunHistory::new(Instant::now());

    let passed = Args::parse().and_then(|args| run(args, &mut history));
    match passed {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}
