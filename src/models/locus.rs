use std::fmt;

use crate::models::{
    hex_to_cartesian, left_normal, ClockwiseKey, FloatType, HexOffset, IntType, Ray, RayPair,
    TileCover, Vector2,
};

/// A cell seen from the observer: a unit-diameter circle that may block line of sight
#[derive(Clone, Debug)]
pub struct Locus {
    // Position relative to the observer
    pub offset: HexOffset,
    pub coord: Vector2,
    // Left normal, half a cell wide
    pub normal: Vector2,
    pub dist2: IntType,
    pub blocks_los: bool,

    // Cover contributed through the left and right bounding rays
    pub cover_left: FloatType,
    pub cover_right: FloatType,
}

impl Locus {
    pub fn new(offset: HexOffset, blocks_los: bool) -> Self {
        let coord = hex_to_cartesian(offset);
        Self {
            offset,
            coord,
            normal: left_normal(coord),
            dist2: offset.dist2(),
            blocks_los,
            cover_left: 0.0,
            cover_right: 0.0,
        }
    }

    /// Sweep order: nearest band first, clockwise within a band
    pub fn sort_key(&self) -> (IntType, ClockwiseKey) {
        (self.dist2, ClockwiseKey::new(self.coord))
    }

    pub fn cover(&self) -> FloatType {
        (self.cover_left + self.cover_right).min(1.0)
    }

    /// Squared hex distance between two loci
    pub fn distance_2(&self, other: &Self) -> IntType {
        (other.offset - self.offset).dist2()
    }

    /// The occluded interval cast by this locus alone
    pub fn to_ray_pair(&self) -> RayPair {
        let left = Ray::from_segment(self.normal, self.coord + self.normal);
        let right = Ray::from_segment(-self.normal, self.coord - self.normal);
        let mut pair = RayPair::new(left, right, false);
        pair.culprits.push(self.offset);
        pair
    }

    /// Result entry with the offset translated back to absolute coordinates
    pub fn to_tile_cover(&self, observer: HexOffset) -> TileCover {
        TileCover {
            offset: self.offset + observer,
            cover: self.cover(),
            dist2: self.dist2,
        }
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Locus<{} {} d2:{} {:.4}/{:.4}{}>",
            self.offset,
            self.coord,
            self.dist2,
            self.cover_left,
            self.cover_right,
            if self.blocks_los { " (blocks)" } else { "" }
        )
    }
}
