//! Hand-checked wall layouts around an observer in the middle of a 5x5 board.

use ahash::AHashMap;
use anyhow::{anyhow, Result};
use float_cmp::approx_eq;

use crate::constants::ALMOST_COVER;
use crate::fov::calculate_hex_fov;
use crate::harness::RunHistory;
use crate::models::{FloatType, HexOffset, IntType, TileSample};

/// Expected cover of a cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expect {
    Clear,
    // Edge shaved by an occluder next to the line of sight
    Almost,
    Half,
    Full,
}

impl Expect {
    pub fn value(self) -> FloatType {
        match self {
            Expect::Clear => 0.0,
            Expect::Almost => *ALMOST_COVER,
            Expect::Half => 0.5,
            Expect::Full => 1.0,
        }
    }
}

type Cell = (IntType, IntType);

#[derive(Debug)]
pub struct Scenario {
    pub name: &'static str,
    // Whole world is the observer's cell only
    pub single_cell: bool,
    pub walls: &'static [Cell],
    pub cells: &'static [(Cell, Expect)],
    // Cover of every cell not listed
    pub default: Expect,
}

pub const OBSERVER: Cell = (2, 2);

const E: Cell = (3, 2);
const N: Cell = (2, 3);
const W: Cell = (1, 2);
const S: Cell = (2, 1);
const NE: Cell = (3, 3);
const SW: Cell = (1, 1);
const NNW: Cell = (1, 3);

use self::Expect::{Almost, Clear, Full, Half};

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "singular",
        single_cell: true,
        walls: &[],
        cells: &[],
        default: Clear,
    },
    Scenario {
        name: "distances",
        single_cell: false,
        walls: &[],
        cells: &[],
        default: Clear,
    },
    Scenario {
        name: "wall_e",
        single_cell: false,
        walls: &[E],
        cells: &[((4, 2), Full), ((4, 3), Almost), ((3, 1), Almost), ((4, 1), Almost)],
        default: Clear,
    },
    Scenario {
        name: "wall_n",
        single_cell: false,
        walls: &[N],
        cells: &[((2, 4), Full), ((1, 3), Almost), ((1, 4), Almost), ((3, 4), Almost)],
        default: Clear,
    },
    Scenario {
        name: "wall_w",
        single_cell: false,
        walls: &[W],
        cells: &[((0, 2), Full), ((0, 1), Almost), ((1, 3), Almost), ((0, 3), Almost)],
        default: Clear,
    },
    Scenario {
        name: "wall_s",
        single_cell: false,
        walls: &[S],
        cells: &[((2, 0), Full), ((1, 0), Almost), ((3, 1), Almost), ((3, 0), Almost)],
        default: Clear,
    },
    Scenario {
        name: "wall_ne",
        single_cell: false,
        walls: &[NE],
        cells: &[((4, 4), Full), ((4, 3), Almost), ((3, 4), Almost)],
        default: Clear,
    },
    Scenario {
        name: "wall_sw",
        single_cell: false,
        walls: &[SW],
        cells: &[((0, 0), Full), ((0, 1), Almost), ((1, 0), Almost)],
        default: Clear,
    },
    Scenario {
        name: "wall_nnw",
        single_cell: false,
        walls: &[NNW],
        cells: &[((0, 4), Full), ((0, 3), Half), ((1, 4), Half)],
        default: Clear,
    },
    Scenario {
        name: "walls_e_n",
        single_cell: false,
        walls: &[E, N],
        cells: &[
            ((4, 2), Full),
            ((2, 4), Full),
            ((4, 3), Almost),
            ((3, 1), Almost),
            ((4, 1), Almost),
            ((1, 3), Almost),
            ((1, 4), Almost),
            ((3, 4), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_n_sw",
        single_cell: false,
        walls: &[N, SW],
        cells: &[
            ((2, 4), Full),
            ((0, 0), Full),
            ((1, 3), Almost),
            ((1, 4), Almost),
            ((3, 4), Almost),
            ((0, 1), Almost),
            ((1, 0), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_e_w",
        single_cell: false,
        walls: &[E, W],
        cells: &[
            ((4, 2), Full),
            ((0, 2), Full),
            ((4, 3), Almost),
            ((3, 1), Almost),
            ((4, 1), Almost),
            ((0, 1), Almost),
            ((1, 3), Almost),
            ((0, 3), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_e_ne",
        single_cell: false,
        walls: &[E, NE],
        cells: &[
            ((4, 2), Full),
            ((4, 3), Full),
            ((4, 4), Full),
            ((3, 1), Almost),
            ((4, 1), Almost),
            ((3, 4), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_n_w",
        single_cell: false,
        walls: &[N, W],
        cells: &[
            ((0, 2), Full),
            ((0, 3), Full),
            ((0, 4), Full),
            ((1, 3), Full),
            ((1, 4), Full),
            ((2, 4), Full),
            ((0, 1), Almost),
            ((3, 4), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_n_nnw",
        single_cell: false,
        walls: &[N, NNW],
        cells: &[
            ((2, 4), Full),
            ((1, 4), Full),
            ((0, 4), Full),
            ((0, 3), Half),
            ((1, 3), Almost),
            ((3, 4), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_w_nnw",
        single_cell: false,
        walls: &[W, NNW],
        cells: &[
            ((0, 2), Full),
            ((0, 3), Full),
            ((0, 4), Full),
            ((1, 4), Half),
            ((1, 3), Almost),
            ((0, 1), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "walls_n_nn",
        single_cell: false,
        walls: &[N, (2, 4)],
        cells: &[((2, 4), Full), ((1, 3), Almost), ((1, 4), Almost), ((3, 4), Almost)],
        default: Clear,
    },
    Scenario {
        name: "walls_n_w_nnw",
        single_cell: false,
        walls: &[N, W, NNW],
        cells: &[
            ((0, 2), Full),
            ((0, 3), Full),
            ((0, 4), Full),
            ((1, 3), Full),
            ((1, 4), Full),
            ((2, 4), Full),
            ((0, 1), Almost),
            ((3, 4), Almost),
        ],
        default: Clear,
    },
    Scenario {
        name: "half_plane_e_ne_n_w",
        single_cell: false,
        walls: &[E, NE, N, W],
        cells: &[
            ((0, 0), Clear),
            ((1, 0), Clear),
            ((1, 1), Clear),
            ((2, 0), Clear),
            ((2, 1), Clear),
            ((2, 2), Clear),
            ((3, 0), Clear),
            ((4, 0), Clear),
            ((3, 2), Clear),
            ((3, 3), Clear),
            ((2, 3), Clear),
            ((1, 2), Clear),
            ((0, 1), Almost),
            ((3, 1), Almost),
            ((4, 1), Almost),
        ],
        default: Full,
    },
    Scenario {
        name: "half_plane_e_s_sw_w",
        single_cell: false,
        walls: &[E, S, SW, W],
        cells: &[
            ((4, 4), Clear),
            ((3, 4), Clear),
            ((3, 3), Clear),
            ((2, 4), Clear),
            ((2, 3), Clear),
            ((2, 2), Clear),
            ((1, 4), Clear),
            ((0, 4), Clear),
            ((3, 2), Clear),
            ((2, 1), Clear),
            ((1, 1), Clear),
            ((1, 2), Clear),
            ((4, 3), Almost),
            ((1, 3), Almost),
            ((0, 3), Almost),
        ],
        default: Full,
    },
    Scenario {
        name: "half_plane_ne_e_s_sw",
        single_cell: false,
        walls: &[NE, E, S, SW],
        cells: &[
            ((0, 2), Clear),
            ((0, 3), Clear),
            ((0, 4), Clear),
            ((1, 1), Clear),
            ((1, 2), Clear),
            ((1, 3), Clear),
            ((1, 4), Clear),
            ((2, 1), Clear),
            ((2, 2), Clear),
            ((2, 3), Clear),
            ((2, 4), Clear),
            ((3, 2), Clear),
            ((3, 3), Clear),
            ((0, 1), Almost),
            ((3, 4), Almost),
        ],
        default: Full,
    },
    Scenario {
        name: "half_plane_ne_n_w_sw",
        single_cell: false,
        walls: &[NE, N, W, SW],
        cells: &[
            ((4, 2), Clear),
            ((4, 1), Clear),
            ((4, 0), Clear),
            ((3, 3), Clear),
            ((3, 2), Clear),
            ((3, 1), Clear),
            ((3, 0), Clear),
            ((2, 3), Clear),
            ((2, 2), Clear),
            ((2, 1), Clear),
            ((2, 0), Clear),
            ((1, 2), Clear),
            ((1, 1), Clear),
            ((4, 3), Almost),
            ((1, 0), Almost),
        ],
        default: Full,
    },
    Scenario {
        name: "enclosure_ne_n_w_sw_s",
        single_cell: false,
        walls: &[NE, N, W, SW, S],
        cells: &[
            ((1, 1), Clear),
            ((1, 2), Clear),
            ((2, 1), Clear),
            ((2, 2), Clear),
            ((2, 3), Clear),
            ((3, 2), Clear),
            ((3, 3), Clear),
            ((4, 0), Clear),
            ((4, 1), Clear),
            ((4, 2), Clear),
            ((3, 0), Almost),
            ((3, 1), Almost),
            ((4, 3), Almost),
        ],
        default: Full,
    },
];

impl Scenario {
    pub fn find(name: &str) -> Option<&'static Scenario> {
        SCENARIOS.iter().find(|scenario| scenario.name == name)
    }

    pub fn observer(&self) -> HexOffset {
        if self.single_cell {
            HexOffset::ORIGIN
        } else {
            OBSERVER.into()
        }
    }

    pub fn world(&self) -> Vec<TileSample> {
        if self.single_cell {
            return vec![TileSample::new(0, 0, false)];
        }
        let mut world = Vec::with_capacity(25);
        for x in 0..5 {
            for y in 0..5 {
                world.push(TileSample::new(x, y, self.walls.contains(&(x, y))));
            }
        }
        world
    }

    pub fn expected(&self, cell: Cell) -> FloatType {
        self.cells
            .iter()
            .find(|(listed, _)| *listed == cell)
            .map_or(self.default, |(_, expect)| *expect)
            .value()
    }

    /// Run the sweep and list every cell that does not match
    pub fn check(&self) -> Result<(), Vec<String>> {
        let world = self.world();
        let observer = self.observer();
        let result = calculate_hex_fov(observer, &world, None).map_err(|err| vec![err.to_string()])?;

        let mut errors = Vec::new();
        if result.len() != world.len() {
            errors.push(format!("{} cells in, {} out", world.len(), result.len()));
        }
        let mut seen: AHashMap<Cell, FloatType> = AHashMap::new();
        for tile in result.iter() {
            let cell = (tile.offset.x, tile.offset.y);
            if seen.insert(cell, tile.cover).is_some() {
                errors.push(format!("{} returned twice", tile.offset));
            }
            let d = tile.offset - observer;
            if tile.dist2 != d.dist2() {
                errors.push(format!("{} has dist2 {}, expected {}", tile.offset, tile.dist2, d.dist2()));
            }
            let expected = self.expected(cell);
            if !approx_eq!(f64, expected, tile.cover, epsilon = 1e-12) {
                errors.push(format!("{} has cover {}, expected {}", tile.offset, tile.cover, expected));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Run the named scenarios, all of them when `names` is empty. Returns the
/// number of failed scenarios.
pub fn run_unit(names: &[String], history: &mut RunHistory) -> Result<usize> {
    let selected: Vec<&Scenario> = if names.is_empty() {
        SCENARIOS.iter().collect()
    } else {
        names
            .iter()
            .map(|name| Scenario::find(name).ok_or_else(|| anyhow!("Unknown scenario {}", name)))
            .collect::<Result<_>>()?
    };

    let mut failed = 0;
    for scenario in selected {
        match scenario.check() {
            Ok(()) => history.add_message(format!("{}: ok", scenario.name)),
            Err(errors) => {
                failed += 1;
                for error in errors.iter() {
                    log::error!("{}: {}", scenario.name, error);
                }
                history.add_message(format!("{}: FAILED ({} mismatches)", scenario.name, errors.len()));
            }
        }
    }
    history.add_message(format!("Unit scenarios done, {} failed", failed));
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn assert_scenario(name: &str) {
        let scenario = Scenario::find(name).unwrap();
        if let Err(errors) = scenario.check() {
            panic!("{}:\n{}", name, errors.join("\n"));
        }
    }

    #[test]
    fn scenario_names_are_unique() {
        for (i, a) in SCENARIOS.iter().enumerate() {
            assert!(SCENARIOS.iter().skip(i + 1).all(|b| b.name != a.name));
        }
        assert_eq!(23, SCENARIOS.len());
    }

    #[test]
    fn unknown_scenario_is_an_error() {
        let mut history = RunHistory::new(Instant::now());
        assert!(run_unit(&["nope".to_owned()], &mut history).is_err());
        assert_eq!(0, run_unit(&["singular".to_owned()], &mut history).unwrap());
    }

    #[test]
    fn singular() {
        assert_scenario("singular");
    }

    #[test]
    fn distances() {
        assert_scenario("distances");
    }

    #[test]
    fn wall_e() {
        assert_scenario("wall_e");
    }

    #[test]
    fn wall_n() {
        assert_scenario("wall_n");
    }

    #[test]
    fn wall_w() {
        assert_scenario("wall_w");
    }

    #[test]
    fn wall_s() {
        assert_scenario("wall_s");
    }

    #[test]
    fn wall_ne() {
        assert_scenario("wall_ne");
    }

    #[test]
    fn wall_sw() {
        assert_scenario("wall_sw");
    }

    #[test]
    fn wall_nnw() {
        assert_scenario("wall_nnw");
    }

    #[test]
    fn walls_e_n() {
        assert_scenario("walls_e_n");
    }

    #[test]
    fn walls_n_sw() {
        assert_scenario("walls_n_sw");
    }

    #[test]
    fn walls_e_w() {
        assert_scenario("walls_e_w");
    }

    #[test]
    fn walls_e_ne() {
        assert_scenario("walls_e_ne");
    }

    #[test]
    fn walls_n_w() {
        assert_scenario("walls_n_w");
    }

    #[test]
    fn walls_n_nnw() {
        assert_scenario("walls_n_nnw");
    }

    #[test]
    fn walls_w_nnw() {
        assert_scenario("walls_w_nnw");
    }

    #[test]
    fn walls_n_nn() {
        assert_scenario("walls_n_nn");
    }

    #[test]
    fn walls_n_w_nnw() {
        assert_scenario("walls_n_w_nnw");
    }

    #[test]
    fn half_plane_e_ne_n_w() {
        assert_scenario("half_plane_e_ne_n_w");
    }

    #[test]
    fn half_plane_e_s_sw_w() {
        assert_scenario("half_plane_e_s_sw_w");
    }

    #[test]
    fn half_plane_ne_e_s_sw() {
        assert_scenario("half_plane_ne_e_s_sw");
    }

    #[test]
    fn half_plane_ne_n_w_sw() {
        assert_scenario("half_plane_ne_n_w_sw");
    }

    #[test]
    fn enclosure_ne_n_w_sw_s() {
        assert_scenario("enclosure_ne_n_w_sw_s");
    }
}
