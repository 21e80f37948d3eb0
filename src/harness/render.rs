use ahash::AHashMap;

use crate::level::{Level, Terrain};
use crate::models::{HexOffset, IntType, TileCover};

/// Glyph of one cell given its cover, `None` while not computed yet
fn glyph(terrain: Terrain, cover: Option<f64>) -> char {
    match cover {
        None => ' ',
        Some(cover) if cover >= 1.0 => '~',
        Some(cover) if cover > 0.0 => match terrain {
            Terrain::Floor => ',',
            Terrain::Wall => '%',
        },
        Some(_) => terrain.symbol(),
    }
}

/// Draw `level` as a staggered hex map. Cell `(x, y)` lands on row `x + y`
/// and column `y - x`, so the six neighbors surround it.
pub fn render_level(
    level: &Level,
    observer: HexOffset,
    covers: &[TileCover],
    next: Option<HexOffset>,
) -> String {
    let covers: AHashMap<HexOffset, f64> =
        covers.iter().map(|tile| (tile.offset, tile.cover)).collect();
    let size = level.width + level.height - 1;
    let shift = level.width as IntType - 1;
    let mut canvas = vec![vec![' '; size]; size];

    for loc in level.locations() {
        let terrain = match level.get(loc) {
            Some(terrain) => terrain,
            None => continue,
        };
        let symbol = if loc == observer {
            '@'
        } else if Some(loc) == next {
            '*'
        } else {
            glyph(terrain, covers.get(&loc).copied())
        };
        let row = (loc.x + loc.y) as usize;
        let column = (loc.y - loc.x + shift) as usize;
        canvas[row][column] = symbol;
    }

    let mut output = String::new();
    // Highest row on top so +y points up
    for row in canvas.iter().rev() {
        let line: String = row.iter().collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_every_cell_once() {
        let mut level = Level::open(2, 2);
        level.set(HexOffset::new(1, 0), Terrain::Wall);
        let observer = HexOffset::new(0, 0);
        let covers = vec![
            TileCover {
                offset: HexOffset::new(1, 0),
                cover: 0.0,
                dist2: 1,
            },
            TileCover {
                offset: HexOffset::new(0, 1),
                cover: 0.25,
                dist2: 1,
            },
        ];
        let output = render_level(&level, observer, &covers, Some(HexOffset::new(1, 1)));
        // Rows from top: x+y = 2, 1, 0
        assert_eq!(" *\n# ,\n @\n", output);
    }

    #[test]
    fn hidden_cells_are_shaded() {
        assert_eq!('~', glyph(Terrain::Wall, Some(1.0)));
        assert_eq!('.', glyph(Terrain::Floor, Some(0.0)));
        assert_eq!(' ', glyph(Terrain::Floor, None));
    }
}
