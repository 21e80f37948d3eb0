use std::ffi::OsString;

use anyhow::{anyhow, bail, Result};
use clap::{App, Arg, ArgMatches};

use crate::utils::{Geometry, SeedRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Unit,
    Regression,
    StepThrough,
}

/// Representing the resulting command line arguments
#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub scenarios: Vec<String>,
    pub seeds: Option<SeedRange>,
    pub geometry: Option<Geometry>,
    pub config_path: Option<String>,
    pub report_path: Option<String>,
}

impl Args {
    fn app() -> App<'static, 'static> {
        App::new("hexfov")
            .version("0.1")
            .about("Diagnostics for the hex grid field of view sweep")
            .arg(
                Arg::with_name("unit")
                    .short("u")
                    .long("unit")
                    .help("Run the built-in scenarios, all of them unless some are named (default)"),
            )
            .arg(
                Arg::with_name("regression")
                    .short("r")
                    .long("regression")
                    .conflicts_with_all(&["unit", "step_through"])
                    .help("Run the sweep on one generated level per seed"),
            )
            .arg(
                Arg::with_name("step_through")
                    .short("t")
                    .long("step-through")
                    .conflicts_with("unit")
                    .requires("seeds")
                    .help("Draw the level after every sweep step of a single seed"),
            )
            .arg(
                Arg::with_name("seeds")
                    .short("s")
                    .long("seeds")
                    .takes_value(true)
                    .value_name("X[-Y]")
                    .help("Seed or inclusive seed range"),
            )
            .arg(
                Arg::with_name("geometry")
                    .short("g")
                    .long("geometry")
                    .takes_value(true)
                    .value_name("WxH")
                    .help("Size of the generated levels"),
            )
            .arg(
                Arg::with_name("config")
                    .short("c")
                    .long("config")
                    .takes_value(true)
                    .value_name("FILE")
                    .help("YAML file patching the default configuration"),
            )
            .arg(
                Arg::with_name("report")
                    .short("o")
                    .long("report")
                    .takes_value(true)
                    .value_name("FILE")
                    .help("Path to the JSON regression report"),
            )
            .arg(
                Arg::with_name("scenarios")
                    .multiple(true)
                    .help("Names of the scenarios to run"),
            )
    }

    /// Setup the clap app and parse the command line arguments
    pub fn parse() -> Result<Self> {
        Self::from_matches(&Self::app().get_matches())
    }

    pub fn parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::app().get_matches_from_safe(args)?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mode = if matches.is_present("regression") {
            Mode::Regression
        } else if matches.is_present("step_through") {
            Mode::StepThrough
        } else {
            Mode::Unit
        };

        let seeds = match matches.value_of("seeds") {
            Some(seeds) => Some(seeds.parse::<SeedRange>().map_err(|err| anyhow!(err))?),
            None => None,
        };
        let geometry = match matches.value_of("geometry") {
            Some(geometry) => Some(geometry.parse::<Geometry>().map_err(|err| anyhow!(err))?),
            None => None,
        };

        let scenarios: Vec<String> = matches
            .values_of("scenarios")
            .map(|values| values.map(str::to_owned).collect())
            .unwrap_or_default();

        match mode {
            Mode::StepThrough if !seeds.map_or(false, |seeds| seeds.is_single()) => {
                bail!("Step-through takes exactly one seed")
            }
            Mode::Regression | Mode::StepThrough if !scenarios.is_empty() => {
                bail!("Scenario names only apply to unit mode")
            }
            _ => {}
        }

        Ok(Self {
            mode,
            scenarios,
            seeds,
            geometry,
            config_path: matches.value_of("config").map(str::to_owned),
            report_path: matches.value_of("report").map(str::to_owned),
        })
    }
}
