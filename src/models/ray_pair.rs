use std::f64::consts::PI;
use std::fmt;

use crate::constants::EPSILON;
use crate::fov::FovError;
use crate::models::{cross3, hex_to_cartesian, ClockwiseKey, FloatType, HexOffset, Locus, Vector2};
use crate::utils::FloatCompare;

/// Which bounding ray of a pair a result refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    None,
    Left,
    Right,
    Both,
}

impl Side {
    /// Bit used for this side in a freshness mask
    pub fn mask(self) -> u8 {
        match self {
            Side::None => 0,
            Side::Left => 1,
            Side::Right => 2,
            Side::Both => 3,
        }
    }
}

/// Outcome of testing a locus against a ray pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cover {
    /// Not covered. The side hints which neighboring pair to try next
    Miss(Side),
    /// Covered through one side, or entirely when the side is `Side::None`
    Hit { amount: FloatType, side: Side },
    /// Touching both bounding rays at once
    Straddle { left: FloatType, right: FloatType },
}

impl Cover {
    pub const FULL: Cover = Cover::Hit {
        amount: 1.0,
        side: Side::None,
    };

    /// Single cover amount, -1 for a miss. Not meaningful for a straddle
    pub fn amount(&self) -> FloatType {
        match *self {
            Cover::Miss(_) => -1.0,
            Cover::Hit { amount, .. } => amount,
            Cover::Straddle { left, right } => left.max(right),
        }
    }

    pub fn side(&self) -> Side {
        match *self {
            Cover::Miss(side) => side,
            Cover::Hit { side, .. } => side,
            Cover::Straddle { .. } => Side::Both,
        }
    }

    pub fn is_hit(&self) -> bool {
        !matches!(self, Cover::Miss(_))
    }
}

/// Half-line given by a starting point and a direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub point: Vector2,
    pub direction: Vector2,
}

impl Ray {
    /// Ray starting at `from` and passing through `through`, with a unit direction
    pub fn from_segment(from: Vector2, through: Vector2) -> Self {
        Self {
            point: from,
            direction: (through - from).normalized(),
        }
    }

    pub fn from_vector(point: Vector2, direction: Vector2) -> Self {
        Self { point, direction }
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.point, self.direction)
    }
}

/// Occluded angular interval bounded by a left and a right ray
#[derive(Clone, Debug)]
pub struct RayPair {
    pub left: Ray,
    pub right: Ray,
    // Whether the interval spans more than pi
    pub is_reflex: bool,
    // Whether the interval spans the whole circle
    pub is_world: bool,
    // Loci that shaped this interval, for debugging only
    pub culprits: Vec<HexOffset>,
}

/// Snap values within epsilon of the [0, 1] bounds onto them
fn snap(value: FloatType) -> FloatType {
    if value.approx_eq(0.0) {
        0.0
    } else if value.approx_gte(1.0) {
        1.0
    } else {
        value
    }
}

impl RayPair {
    pub fn new(left: Ray, right: Ray, is_reflex: bool) -> Self {
        Self {
            left,
            right,
            is_reflex,
            is_world: false,
            culprits: Vec::new(),
        }
    }

    /// Position of the pair in the clockwise order of the active list
    pub fn right_key(&self) -> ClockwiseKey {
        ClockwiseKey::new(self.right.point)
    }

    /// Blocked cone behind an observer facing the hex direction `facing` with
    /// an aperture of `aperture` radians.
    pub fn from_facing(facing: HexOffset, aperture: FloatType) -> Self {
        let blocked = 2.0 * PI - aperture;
        let behind = -hex_to_cartesian(facing);
        let half = blocked / 2.0;
        let left = Ray::from_vector(Vector2::ZERO, behind.rotated(half));
        let right = Ray::from_vector(Vector2::ZERO, behind.rotated(-half));
        log::debug!(
            "View cone facing {} blocks {:.4} rad: left {} right {}",
            facing,
            blocked,
            left,
            right
        );
        Self::new(left, right, blocked >= PI)
    }

    /// How much of `locus` this interval hides, and through which side.
    pub fn calculate_cover(&self, locus: &Locus) -> Cover {
        if self.is_world {
            return Cover::FULL;
        }
        if !self.is_reflex {
            let n = -(self.right.point + self.left.point) / 2.0;
            if cross3(self.left.point, self.right.point, locus.coord + n) < 0.0 {
                // South of the chord, the next pair to the right may matter
                return Cover::Miss(Side::Right);
            }
        }

        // Negative when the locus is entirely right of the right ray
        let right = snap(
            self.right
                .direction
                .cross(locus.coord - self.right.point * 2.0),
        );
        if !self.is_reflex && right < 0.0 {
            return Cover::Miss(Side::Right);
        }
        // Negative when the locus is entirely left of the left ray
        let left = snap(
            -self
                .left
                .direction
                .cross(locus.coord - self.left.point * 2.0),
        );
        log::trace!("\t\tleft: {} right: {}", left, right);

        if !self.is_reflex {
            if left < 0.0 {
                return Cover::Miss(Side::Left);
            }
            if left < right {
                return Cover::Hit {
                    amount: left,
                    side: Side::Left,
                };
            }
            if right < 1.0 {
                return Cover::Hit {
                    amount: right,
                    side: Side::Right,
                };
            }
            return Cover::FULL;
        }

        if left < 0.0 && right < 0.0 {
            return Cover::Miss(Side::Right);
        }
        if self.left.direction.dot(self.right.direction) < 0.0 {
            // Rays between 90 and 270 degrees apart, possibly opposite
            if left == 1.0 && right == 1.0 {
                return Cover::FULL;
            }
            if left - EPSILON > right {
                return Cover::Hit {
                    amount: left,
                    side: Side::Left,
                };
            }
            if left + EPSILON > right {
                let left_normal = Vector2::new(-self.left.direction.y, self.left.direction.x);
                if cross3(Vector2::ZERO, left_normal, locus.coord) < 0.0 {
                    return Cover::Hit {
                        amount: left,
                        side: Side::Left,
                    };
                }
            }
            return Cover::Hit {
                amount: right,
                side: Side::Right,
            };
        }
        if left == 1.0 || right == 1.0 {
            return Cover::FULL;
        }
        if left >= 0.0 {
            if right >= 0.0 {
                return Cover::Straddle { left, right };
            }
            return Cover::Hit {
                amount: left,
                side: Side::Left,
            };
        }
        Cover::Hit {
            amount: right,
            side: Side::Right,
        }
    }

    /// Grow the interval over the blocking `locus` adjacent to `side`.
    pub fn merge_locus(&mut self, locus: &Locus, side: Side) {
        self.culprits.push(locus.offset);
        match side {
            Side::Both => self.is_world = true,
            Side::Left => {
                if cross3(self.right.point, self.left.point, locus.normal) <= EPSILON {
                    self.is_reflex = true;
                }
                self.left = Ray::from_segment(locus.normal, locus.coord + locus.normal);
            }
            _ => {
                if cross3(self.left.point, self.right.point, -locus.normal) >= -EPSILON {
                    self.is_reflex = true;
                }
                self.right = Ray::from_segment(-locus.normal, locus.coord - locus.normal);
            }
        }
    }

    /// Splice two intervals that a single blocking locus touches from both sides.
    pub fn merge_pairs_by_locus(
        (first, first_side): (&RayPair, Side),
        (second, second_side): (&RayPair, Side),
    ) -> Result<RayPair, FovError> {
        if std::ptr::eq(first, second) {
            return Err(FovError::SelfMerge);
        }
        if first_side == second_side {
            return Err(FovError::SameSideMerge(first_side));
        }

        let mut reflex = first.is_reflex || second.is_reflex;
        let (left, right) = if first_side == Side::Left {
            if !reflex && cross3(first.right.point, first.left.point, second.left.point) <= EPSILON
            {
                reflex = true;
            }
            (second.left, first.right)
        } else {
            if !reflex && cross3(second.right.point, second.left.point, first.left.point) <= EPSILON
            {
                reflex = true;
            }
            (first.left, second.right)
        };

        let mut pair = RayPair::new(left, right, reflex);
        pair.culprits = first
            .culprits
            .iter()
            .chain(second.culprits.iter())
            .copied()
            .collect();
        Ok(pair)
    }
}

impl fmt::Display for RayPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RayPair<l:{} r:{}", self.left, self.right)?;
        if self.is_world {
            write!(f, " (W)")?;
        }
        if self.is_reflex {
            write!(f, " (ref)")?;
        }
        write!(f, ">")?;
        for culprit in self.culprits.iter() {
            write!(f, " {}", culprit)?;
        }
        Ok(())
    }
}
