use std::collections::VecDeque;
use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::constants::HEX_NEIGHBORS;
use crate::models::{HexOffset, IntType, TileSample};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Terrain {
    Floor,
    Wall,
}

impl Terrain {
    pub fn blocks_los(self) -> bool {
        matches!(self, Terrain::Wall)
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::Floor => '.',
            Terrain::Wall => '#',
        }
    }
}

/// Position of `loc` in column-major storage of a `width x height` grid
pub fn grid_index(width: usize, height: usize, loc: HexOffset) -> Option<usize> {
    let in_bounds =
        loc.x >= 0 && loc.y >= 0 && (loc.x as usize) < width && (loc.y as usize) < height;
    if in_bounds {
        Some(loc.x as usize * height + loc.y as usize)
    } else {
        None
    }
}

/// Rectangular patch of a hex grid in axial coordinates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    // Column major, `x * height + y`
    tiles: Vec<Terrain>,
}

impl Level {
    pub fn new(width: usize, height: usize, fill: Terrain) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
        }
    }

    /// Level with nothing but floor
    pub fn open(width: usize, height: usize) -> Self {
        Self::new(width, height, Terrain::Floor)
    }

    pub fn contains(&self, loc: HexOffset) -> bool {
        self.index(loc).is_some()
    }

    fn index(&self, loc: HexOffset) -> Option<usize> {
        grid_index(self.width, self.height, loc)
    }

    pub fn get(&self, loc: HexOffset) -> Option<Terrain> {
        self.index(loc).map(|index| self.tiles[index])
    }

    /// Out of bounds locations are ignored
    pub fn set(&mut self, loc: HexOffset, terrain: Terrain) {
        if let Some(index) = self.index(loc) {
            self.tiles[index] = terrain;
        }
    }

    pub fn blocks_los(&self, loc: HexOffset) -> bool {
        self.get(loc).map_or(false, Terrain::blocks_los)
    }

    pub fn center(&self) -> HexOffset {
        HexOffset::new((self.width / 2) as IntType, (self.height / 2) as IntType)
    }

    /// Every location, x major
    pub fn locations(&self) -> impl Iterator<Item = HexOffset> + '_ {
        (0..self.width).flat_map(move |x| {
            (0..self.height).map(move |y| HexOffset::new(x as IntType, y as IntType))
        })
    }

    /// In-bounds hex neighbors of `loc`
    pub fn neighbors(&self, loc: HexOffset) -> impl Iterator<Item = HexOffset> + '_ {
        HEX_NEIGHBORS
            .iter()
            .map(move |&direction| loc + direction)
            .filter(move |&neighbor| self.contains(neighbor))
    }

    /// Input for the field-of-view sweep
    pub fn samples(&self) -> Vec<TileSample> {
        self.locations()
            .map(|loc| TileSample::new(loc.x, loc.y, self.blocks_los(loc)))
            .collect()
    }

    /// Breadth-first search for the closest cell that does not block sight
    pub fn nearest_open(&self, start: HexOffset) -> Option<HexOffset> {
        if !self.contains(start) {
            return None;
        }
        let mut visited = AHashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(loc) = queue.pop_front() {
            if !self.blocks_los(loc) {
                return Some(loc);
            }
            for neighbor in self.neighbors(loc) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }

    /// Rows of terrain symbols, one row per y
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.tiles[x * self.height + y].symbol())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
