//! What an observer currently sees of a level and what it remembers.

use crate::fov::{calculate_hex_fov, FovError, ViewCone};
use crate::level::{grid_index, Level, Terrain};
use crate::models::{FloatType, HexOffset, IntType};

#[derive(Clone, Debug, PartialEq)]
pub struct PerceivedTile {
    pub cover: FloatType,
    pub dist2: IntType,
    pub was_seen: bool,
    // Terrain as it looked the last time the tile was visible
    pub remembered: Option<Terrain>,
}

impl PerceivedTile {
    fn unseen() -> Self {
        Self {
            cover: 1.0,
            dist2: 0,
            was_seen: false,
            remembered: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.cover < 1.0
    }
}

/// Per-observer view of a level, refreshed by [`PerceptionGrid::update`]
#[derive(Clone, Debug)]
pub struct PerceptionGrid {
    pub width: usize,
    pub height: usize,
    tiles: Vec<PerceivedTile>,
    view_cone: Option<ViewCone>,
}

impl PerceptionGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![PerceivedTile::unseen(); width * height],
            view_cone: None,
        }
    }

    pub fn for_level(level: &Level) -> Self {
        Self::new(level.width, level.height)
    }

    pub fn with_view_cone(mut self, view_cone: Option<ViewCone>) -> Self {
        self.view_cone = view_cone;
        self
    }

    fn index(&self, loc: HexOffset) -> Option<usize> {
        grid_index(self.width, self.height, loc)
    }

    pub fn tile(&self, loc: HexOffset) -> Option<&PerceivedTile> {
        self.index(loc).map(|index| &self.tiles[index])
    }

    pub fn is_visible(&self, loc: HexOffset) -> bool {
        self.tile(loc).map_or(false, PerceivedTile::is_visible)
    }

    /// Recompute cover from `observer` and refresh the memory of every visible tile
    pub fn update(&mut self, level: &Level, observer: HexOffset) -> Result<(), FovError> {
        // Covers outside [0, 1] are rejected by the sweep itself
        let result = calculate_hex_fov(observer, &level.samples(), self.view_cone)?;
        for tile in result.iter() {
            let index = match self.index(tile.offset) {
                Some(index) => index,
                None => continue,
            };
            let perceived = &mut self.tiles[index];
            perceived.dist2 = tile.dist2;
            perceived.cover = tile.cover;
            if perceived.is_visible() {
                perceived.was_seen = true;
                perceived.remembered = level.get(tile.offset);
            }
        }
        log::debug!(
            "Observer {} sees {} tiles",
            observer,
            self.tiles.iter().filter(|tile| tile.is_visible()).count()
        );
        Ok(())
    }

    /// Terrain to display at `loc`: live when visible, remembered when hidden,
    /// nothing if never seen
    pub fn top(&self, level: &Level, loc: HexOffset) -> Option<Terrain> {
        let tile = self.tile(loc)?;
        if !tile.was_seen {
            return None;
        }
        if tile.is_visible() {
            level.get(loc)
        } else {
            tile.remembered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_blind() {
        let grid = PerceptionGrid::new(3, 3);
        let level = Level::open(3, 3);
        let tile = grid.tile(HexOffset::new(1, 1)).unwrap();
        assert_eq!(1.0, tile.cover);
        assert!(!tile.was_seen);
        assert_eq!(None, grid.top(&level, HexOffset::new(1, 1)));
        assert!(grid.tile(HexOffset::new(3, 0)).is_none());
    }

    #[test]
    fn open_board_is_fully_visible() {
        let level = Level::open(5, 5);
        let mut grid = PerceptionGrid::for_level(&level);
        grid.update(&level, HexOffset::new(2, 2)).unwrap();
        for loc in level.locations() {
            assert!(grid.is_visible(loc));
            assert_eq!(Some(Terrain::Floor), grid.top(&level, loc));
        }
        assert_eq!(7, grid.tile(HexOffset::new(4, 1)).unwrap().dist2);
    }

    #[test]
    fn hidden_tiles_keep_their_memory() {
        let mut level = Level::open(5, 5);
        let mut grid = PerceptionGrid::for_level(&level);
        let observer = HexOffset::new(2, 2);
        grid.update(&level, observer).unwrap();

        level.set(HexOffset::new(3, 2), Terrain::Wall);
        level.set(HexOffset::new(4, 2), Terrain::Wall);
        grid.update(&level, observer).unwrap();

        let behind = HexOffset::new(4, 2);
        assert!(!grid.is_visible(behind));
        assert!(grid.tile(behind).unwrap().was_seen);
        assert_eq!(Some(Terrain::Floor), grid.top(&level, behind));
        assert_eq!(Some(Terrain::Wall), grid.top(&level, HexOffset::new(3, 2)));
    }
}
