use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::fov::ViewCone;
use crate::harness::RunHistory;
use crate::level::{CellularAutomata, Level};
use crate::models::HexOffset;
use crate::perception::PerceptionGrid;
use crate::utils::{Geometry, Random, SeedRange};

/// Everything needed to reproduce one failed run
#[derive(Debug, Serialize)]
pub struct RegressionFailure {
    pub seed: u64,
    pub geometry: String,
    pub observer: HexOffset,
    pub error: String,
    pub level: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegressionReport {
    pub started_at: DateTime<Utc>,
    pub geometry: String,
    pub seeds: String,
    pub runs: u64,
    pub failures: Vec<RegressionFailure>,
}

impl RegressionReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generated level for `seed` and the observer position used on it
pub fn generate(config: &Config, seed: u64, geometry: Geometry) -> (Level, HexOffset) {
    let random = Random::from_seed(seed);
    let level = CellularAutomata::from_config(config).generate(&random, geometry.width, geometry.height);
    let center = level.center();
    let observer = level.nearest_open(center).unwrap_or(center);
    (level, observer)
}

pub fn run_seed(
    config: &Config,
    seed: u64,
    geometry: Geometry,
    view_cone: Option<ViewCone>,
) -> Result<PerceptionGrid, RegressionFailure> {
    let (level, observer) = generate(config, seed, geometry);
    let mut grid = PerceptionGrid::for_level(&level).with_view_cone(view_cone);
    match grid.update(&level, observer) {
        Ok(()) => Ok(grid),
        Err(err) => Err(RegressionFailure {
            seed,
            geometry: geometry.to_string(),
            observer,
            error: err.to_string(),
            level: level.rows(),
        }),
    }
}

/// Run the sweep once per seed on a freshly generated level
pub fn run_regression(
    config: &Config,
    seeds: SeedRange,
    geometry: Geometry,
    view_cone: Option<ViewCone>,
    history: &mut RunHistory,
) -> RegressionReport {
    let mut report = RegressionReport {
        started_at: Utc::now(),
        geometry: geometry.to_string(),
        seeds: seeds.to_string(),
        runs: 0,
        failures: Vec::new(),
    };
    history.add_message(format!(
        "Regression over {} seeds ({}) on {}",
        seeds.count(),
        seeds,
        geometry
    ));

    for seed in seeds.iter() {
        report.runs += 1;
        if let Err(failure) = run_seed(config, seed, geometry, view_cone) {
            log::error!(
                "Seed {} observer {}: {}\n{}",
                seed,
                failure.observer,
                failure.error,
                failure.level.join("\n")
            );
            report.failures.push(failure);
        }
    }
    history.add_message(format!(
        "Regression done, {} of {} runs failed",
        report.failures.len(),
        report.runs
    ));
    report
}
