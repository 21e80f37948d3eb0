use std::cmp::Ordering;

use crate::constants::HEX_TRANSFORM;
use crate::models::{FloatType, HexOffset, Vector2};

/// Project an axial hex offset onto the cartesian plane.
///
/// The squared length of the result equals the hex metric of the offset, so
/// cells at the same hex distance share a circle around the origin.
pub fn hex_to_cartesian(offset: HexOffset) -> Vector2 {
    let (x, y) = (offset.x as FloatType, offset.y as FloatType);
    Vector2::new(
        HEX_TRANSFORM[0][0] * x + HEX_TRANSFORM[0][1] * y,
        HEX_TRANSFORM[1][0] * x + HEX_TRANSFORM[1][1] * y,
    )
}

/// Left normal of the ray from the origin to `coord`, scaled to the radius of a
/// unit-diameter circle. The origin has no direction and gets a zero normal.
pub fn left_normal(coord: Vector2) -> Vector2 {
    let factor = coord.length() * 2.0;
    if factor == 0.0 {
        return Vector2::ZERO;
    }
    Vector2::new(-coord.y / factor, coord.x / factor)
}

/// Sort key ordering points clockwise starting at the positive y axis.
///
/// Points right of the y axis come first, highest first; the rest follow,
/// lowest first. For points on a common circle around the origin this is the
/// clockwise angular order.
#[derive(Clone, Copy, Debug)]
pub struct ClockwiseKey {
    west: bool,
    rank: FloatType,
}

impl ClockwiseKey {
    pub fn new(point: Vector2) -> Self {
        if point.x > 0.0 {
            Self {
                west: false,
                rank: -point.y,
            }
        } else {
            Self {
                west: true,
                rank: point.y,
            }
        }
    }
}

impl PartialEq for ClockwiseKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ClockwiseKey {}

impl PartialOrd for ClockwiseKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClockwiseKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.west.cmp(&other.west).then_with(|| {
            self.rank
                .partial_cmp(&other.rank)
                .unwrap_or(Ordering::Equal)
        })
    }
}
