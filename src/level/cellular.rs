use crate::config::Config;
use crate::level::{Level, Terrain};
use crate::models::{FloatType, HexOffset, IntType};
use crate::utils::Random;

/// Cave generator: random walls smoothed by a neighbor-count rule
#[derive(Clone, Debug)]
pub struct CellularAutomata {
    pub initial_wall_ratio: FloatType,
    // Fewer walls than this around a cell turn it into floor
    pub floor_threshold: usize,
    // At least this many walls around a cell turn it into wall
    pub wall_threshold: usize,
    pub iterations: usize,
}

impl CellularAutomata {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_wall_ratio: config.initial_wall_ratio,
            floor_threshold: config.floor_threshold,
            wall_threshold: config.wall_threshold,
            iterations: config.smoothing_iterations,
        }
    }

    /// Walls in the neighborhood of `loc`, the cell itself included
    fn count_walls(level: &Level, loc: HexOffset) -> usize {
        let own = level.blocks_los(loc) as usize;
        own + level
            .neighbors(loc)
            .filter(|&neighbor| level.blocks_los(neighbor))
            .count()
    }

    fn is_border(level: &Level, loc: HexOffset) -> bool {
        loc.x == 0
            || loc.y == 0
            || loc.x == level.width as IntType - 1
            || loc.y == level.height as IntType - 1
    }

    pub fn generate(&self, random: &Random, width: usize, height: usize) -> Level {
        let mut level = Level::open(width, height);
        let mut interior = Vec::new();
        for loc in level.locations().collect::<Vec<_>>() {
            if Self::is_border(&level, loc) {
                level.set(loc, Terrain::Wall);
            } else {
                interior.push(loc);
            }
        }

        let walls = (self.initial_wall_ratio * interior.len() as FloatType) as usize;
        for _ in 0..walls.min(interior.len()) {
            let loc = interior.remove(random.range_usize(0, interior.len()));
            level.set(loc, Terrain::Wall);
        }

        for _ in 0..self.iterations {
            level = self.smooth(&level);
        }
        level
    }

    /// One generation of the automaton. The border is never touched.
    fn smooth(&self, level: &Level) -> Level {
        let mut next = level.clone();
        for loc in level.locations() {
            if Self::is_border(level, loc) {
                continue;
            }
            let walls = Self::count_walls(level, loc);
            if walls == 0 || walls >= self.wall_threshold {
                next.set(loc, Terrain::Wall);
            } else if walls < self.floor_threshold {
                next.set(loc, Terrain::Floor);
            }
        }
        next
    }
}
